use clap::{Args, CommandFactory, Parser, Subcommand};
use portico::model::{DisplayMode, MainCategory};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "portico",
    bin_name = "portico",
    version,
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Project data for an architecture portfolio site", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to PORTICO_CONFIG, then the OS config dir)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Browse,
    Edit,
    Site,
    Data,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Browse => "Browse:",
            CommandGroup::Edit => "Edit Projects:",
            CommandGroup::Site => "Site Settings:",
            CommandGroup::Data => "Data:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "list" | "show" | "featured" | "row" => Some(CommandGroup::Browse),
            "add" | "update" | "archive" | "unarchive" | "delete" | "feature" | "unfeature"
            | "replace" => Some(CommandGroup::Edit),
            "social" | "mode" => Some(CommandGroup::Site),
            "import" | "sync" | "watch" => Some(CommandGroup::Data),
            "categories" | "status" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Browse,
            CommandGroup::Edit,
            CommandGroup::Site,
            CommandGroup::Data,
            CommandGroup::Misc,
        ]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("portico {version}\n"));
    output.push_str("Project data for an architecture portfolio site\n");
    output.push('\n');
    output.push_str("Usage: portico [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();
    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", sc.get_name(), about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --config <FILE>  Config file\n");
    output.push_str("  -v, --verbose        Verbose output\n");
    output.push_str("  -h, --help           Print help\n");
    output.push_str("  -V, --version        Print version\n");
    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints clap's help for one subcommand, or the grouped help if unknown.
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();
    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }
    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Browse(c) => match c {
                BrowseCommands::List { .. } => "list",
                BrowseCommands::Show { .. } => "show",
                BrowseCommands::Featured { .. } => "featured",
                BrowseCommands::Row { .. } => "row",
            },
            Commands::Edit(c) => match c {
                EditCommands::Add { .. } => "add",
                EditCommands::Update { .. } => "update",
                EditCommands::Archive { .. } => "archive",
                EditCommands::Unarchive { .. } => "unarchive",
                EditCommands::Delete { .. } => "delete",
                EditCommands::Feature { .. } => "feature",
                EditCommands::Unfeature { .. } => "unfeature",
                EditCommands::Replace { .. } => "replace",
            },
            Commands::Site(c) => match c {
                SiteCommands::Social { .. } => "social",
                SiteCommands::Mode { .. } => "mode",
            },
            Commands::Data(c) => match c {
                DataCommands::Import { .. } => "import",
                DataCommands::Sync => "sync",
                DataCommands::Watch { .. } => "watch",
            },
            Commands::Misc(c) => match c {
                MiscCommands::Categories { .. } => "categories",
                MiscCommands::Status => "status",
                MiscCommands::Help { .. } => "help",
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Browse(BrowseCommands),

    #[command(flatten)]
    Edit(EditCommands),

    #[command(flatten)]
    Site(SiteCommands),

    #[command(flatten)]
    Data(DataCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum BrowseCommands {
    /// List projects
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Show archived projects instead
        #[arg(long)]
        archived: bool,
    },

    /// Show a project with related projects
    #[command(alias = "v", display_order = 2)]
    Show { id: u64 },

    /// Show the homepage selection
    #[command(display_order = 3)]
    Featured {
        /// Selection mode (random or featured); defaults to the stored mode
        mode: Option<DisplayMode>,
    },

    /// Show one gallery row
    #[command(display_order = 4)]
    Row {
        /// 1-based page number
        #[arg(default_value_t = 1)]
        page: usize,

        /// Restrict to a main category
        #[arg(long = "main")]
        main_category: Option<MainCategory>,

        /// Match any of these subcategories (repeatable)
        #[arg(long = "sub")]
        sub_categories: Vec<String>,
    },
}

/// Project fields shared by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct ProjectFields {
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Gallery image URL (repeatable)
    #[arg(long = "gallery")]
    pub gallery_images: Vec<String>,
    #[arg(long)]
    pub architect: Option<String>,
    #[arg(long)]
    pub area: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EditCommands {
    /// Add a project
    #[command(alias = "n", display_order = 10)]
    Add {
        /// Title words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        #[arg(long = "main")]
        main_category: MainCategory,

        /// Subcategory (repeatable)
        #[arg(long = "sub")]
        sub_categories: Vec<String>,

        /// Flag the project as featured
        #[arg(long)]
        featured: bool,

        #[command(flatten)]
        fields: ProjectFields,
    },

    /// Edit project metadata
    #[command(alias = "e", display_order = 11)]
    Update {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long = "main")]
        main_category: Option<MainCategory>,

        /// Replace the subcategories (repeatable)
        #[arg(long = "sub")]
        sub_categories: Vec<String>,

        #[command(flatten)]
        fields: ProjectFields,
    },

    /// Archive projects (hidden from the site, kept in the store)
    #[command(display_order = 12)]
    Archive {
        /// Project ids (e.g. 3 5 or 3-5)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Restore archived projects
    #[command(display_order = 13)]
    Unarchive {
        /// Project ids (e.g. 3 5 or 3-5)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Permanently delete projects
    #[command(alias = "rm", display_order = 14)]
    Delete {
        /// Project ids (e.g. 3 5 or 3-5)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Flag projects as featured
    #[command(display_order = 15)]
    Feature {
        /// Project ids (e.g. 3 5 or 3-5)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Remove the featured flag (refused at the featured floor)
    #[command(display_order = 16)]
    Unfeature {
        /// Project ids (e.g. 3 5 or 3-5)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Swap a featured project for another one
    #[command(display_order = 17)]
    Replace { outgoing: u64, incoming: u64 },
}

#[derive(Subcommand, Debug)]
pub enum SiteCommands {
    /// Show or replace the social links
    #[command(display_order = 20)]
    Social {
        #[arg(long)]
        instagram: Option<String>,
        #[arg(long)]
        twitter: Option<String>,
        #[arg(long)]
        linkedin: Option<String>,

        /// Remove all links
        #[arg(long, conflicts_with_all = ["instagram", "twitter", "linkedin"])]
        clear: bool,
    },

    /// Show or set the homepage display mode
    #[command(display_order = 21)]
    Mode {
        /// random or featured
        mode: Option<DisplayMode>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Seed the store from a JSON array of projects
    #[command(display_order = 30)]
    Import {
        path: PathBuf,

        /// Import even when the store already holds projects
        #[arg(long)]
        append: bool,
    },

    /// Reload from the remote store and pick up external mirror changes
    #[command(display_order = 31)]
    Sync,

    /// Sync on the configured poll interval
    #[command(display_order = 32)]
    Watch {
        /// Stop after this many polls
        #[arg(long)]
        ticks: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// List the subcategory vocabulary
    #[command(display_order = 40)]
    Categories {
        /// Only this main category
        main: Option<MainCategory>,
    },

    /// Connectivity, featured floor and mirror state
    #[command(display_order = 41)]
    Status,

    /// Print help for portico or a subcommand
    #[command(display_order = 42)]
    Help { command: Option<String> },
}
