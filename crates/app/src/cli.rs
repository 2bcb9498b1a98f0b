use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "billkeeper", disable_version_flag = true)]
#[command(about = "Split shared bills in LKR and report who owes what")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the directory the bills are stored in.
    #[arg(long, global = true, env = "BILLKEEPER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Bill(BillArgs),
    Participant(ParticipantArgs),
    Item(ItemArgs),
    /// Write the split of a bill as CSV or plain text.
    Export(ExportArgs),
    /// Email a participant their share, or print a mailto link.
    Send(SendArgs),
}

#[derive(Args, Debug)]
pub struct BillArgs {
    #[command(subcommand)]
    pub command: BillCommand,
}

#[derive(Subcommand, Debug)]
pub enum BillCommand {
    New {
        #[arg(long)]
        title: Option<String>,
        /// Bill date (YYYY-MM-DD), today by default.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    List,
    Show {
        bill: String,
    },
    Rename {
        bill: String,
        /// New title; an empty title leaves the bill untitled.
        title: String,
    },
    Redate {
        bill: String,
        date: NaiveDate,
    },
    Delete {
        bill: String,
    },
}

#[derive(Args, Debug)]
pub struct ParticipantArgs {
    #[command(subcommand)]
    pub command: ParticipantCommand,
}

#[derive(Subcommand, Debug)]
pub enum ParticipantCommand {
    Add {
        bill: String,
        name: String,
        #[arg(long)]
        email: Option<String>,
    },
    Remove {
        bill: String,
        who: String,
    },
}

#[derive(Args, Debug)]
pub struct ItemArgs {
    #[command(subcommand)]
    pub command: ItemCommand,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    Add {
        bill: String,
        name: String,
        /// Unit price in rupees, e.g. 1250.50
        #[arg(allow_hyphen_values = true)]
        price: String,
        #[arg(long)]
        quantity: Option<String>,
    },
    Edit {
        bill: String,
        item: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
    },
    Delete {
        bill: String,
        item: String,
    },
    /// Assign or unassign a participant; an item with nobody assigned is shared.
    Toggle {
        bill: String,
        item: String,
        who: String,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    #[default]
    Text,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    pub bill: String,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Output file, or a directory to write a generated file name into.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    pub bill: String,
    pub who: String,
    /// Print the report payload as JSON instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "billkeeper",
            "item",
            "add",
            "dinner",
            "Kottu",
            "1250.50",
            "--quantity",
            "2",
        ])
        .unwrap();

        let Command::Item(ItemArgs {
            command:
                ItemCommand::Add {
                    bill,
                    name,
                    price,
                    quantity,
                },
        }) = cli.command
        else {
            panic!("expected item add");
        };
        assert_eq!(bill, "dinner");
        assert_eq!(name, "Kottu");
        assert_eq!(price, "1250.50");
        assert_eq!(quantity.as_deref(), Some("2"));
    }

    #[test]
    fn negative_price_reaches_validation() {
        let cli =
            Cli::try_parse_from(["billkeeper", "item", "add", "b", "Refund", "-10"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Item(ItemArgs {
                command: ItemCommand::Add { ref price, .. }
            }) if price == "-10"
        ));
    }
}
