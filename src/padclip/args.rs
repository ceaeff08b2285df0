use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "padclip")]
#[command(about = "Multi-pad selection clipboard for records and files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Whose clipboard to use (defaults to $USER)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Restrict this run to the default pad
    #[arg(long, global = true)]
    pub lock: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select one or more records of a schema
    #[command(alias = "s")]
    Select {
        /// Schema of the records (e.g. tt_content)
        schema: String,

        /// Record ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Switch the active pad to copy mode afterwards
        #[arg(long)]
        copy: bool,
    },

    /// Select one or more files or folders
    #[command(alias = "sf")]
    SelectFile {
        #[arg(required = true, num_args = 1..)]
        paths: Vec<String>,

        /// Switch the active pad to copy mode afterwards
        #[arg(long)]
        copy: bool,
    },

    /// Deselect an item on the active pad
    Deselect {
        /// Selection key (schema|id), or a path with --file
        key: String,

        /// Treat the argument as a file path
        #[arg(long)]
        file: bool,
    },

    /// Remove a key from the active pad
    #[command(alias = "rm")]
    Remove {
        /// Selection key (schema|id or _FILE|hash)
        key: String,
    },

    /// Empty a pad (defaults to the active one)
    Clear {
        /// Pad name (normal, tab_1, ...)
        pad: Option<String>,
    },

    /// Switch the active pad
    Pad {
        /// Pad name (normal, tab_1, ...)
        name: String,
    },

    /// Set the paste mode of the active pad
    Mode {
        /// move or copy
        mode: String,
    },

    /// Show pads and the active selection
    #[command(alias = "ls")]
    List {
        /// Show files instead of records
        #[arg(long)]
        files: bool,
    },

    /// Drop selections whose record or file no longer exists
    Prune,

    /// Compile a paste batch for the selected records
    Paste {
        /// Target reference: <schema>|<targetId>
        target: String,

        /// Field overlay applied to every pasted record (JSON object)
        #[arg(long)]
        update: Option<String>,
    },

    /// Compile a paste batch for the selected files
    PasteFiles {
        /// Target folder: _FILE|<target> or <target>
        target: String,
    },

    /// Compile a delete batch for the active selection
    Delete {
        /// Delete selected files instead of records
        #[arg(long)]
        files: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (pads, persistent, schemas)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_select_with_global_flags() {
        let cli = Cli::try_parse_from([
            "padclip", "select", "tt_content", "5", "7", "--user", "alice", "--lock",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert!(cli.lock);
        match cli.command {
            Some(Commands::Select { schema, ids, copy }) => {
                assert_eq!(schema, "tt_content");
                assert_eq!(ids, vec!["5", "7"]);
                assert!(!copy);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn paste_accepts_update_overlay() {
        let cli =
            Cli::try_parse_from(["padclip", "paste", "pages|30", "--update", r#"{"colPos":1}"#])
                .unwrap();
        match cli.command {
            Some(Commands::Paste { target, update }) => {
                assert_eq!(target, "pages|30");
                assert_eq!(update.as_deref(), Some(r#"{"colPos":1}"#));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn select_requires_ids() {
        assert!(Cli::try_parse_from(["padclip", "select", "pages"]).is_err());
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["padclip"]).unwrap();
        assert!(cli.command.is_none());
    }
}
