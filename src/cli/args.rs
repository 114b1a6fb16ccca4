use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "elegirclinica",
    version,
    about = "Elegir Clínica admin client",
    long_about = "Administrative client for the Elegir Clínica ranking service: list, search, create, edit and delete clinics, ratings and products.\n\nExamples:\n  elegirclinica clinicas list\n  elegirclinica clinicas search San\n  elegirclinica clinicas show --query '?id=7'\n  elegirclinica clinicas update --query '?id=7' --set telefono=1144445555\n  elegirclinica ratings list --query '?id_clinica=12'\n  elegirclinica --profile local productos create --set nombre=Gasa --set stock=10 --set precio=2.5\n\nKnown values:\n  financ  publico | privado | mixto\n  tipo    instalaciones | medicos | servicio"
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'f',
        long = "format",
        visible_alias = "output-format",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Output format (text, json, html)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        global = true,
        help_heading = "Output",
        help = "Write the rendered view to a file."
    )]
    pub output: Option<String>,

    #[arg(
        long = "page-url",
        value_name = "URL",
        global = true,
        help_heading = "Output",
        help = "URL of the page being rendered; marks the matching menu link in HTML output."
    )]
    pub page_url: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Backend",
        help = "Path to config file (defaults to ~/.elegirclinica/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'u',
        long = "api-url",
        value_name = "URL",
        global = true,
        help_heading = "Backend",
        help = "Backend root URL (overrides ELEGIR_CLINICA_API_URL and the config file)."
    )]
    pub api_url: Option<String>,

    #[arg(
        short = 'p',
        long = "profile",
        value_name = "PROFILE",
        global = true,
        help_heading = "Backend",
        help = "Backend profile used when no URL is configured (production or local)."
    )]
    pub profile: Option<String>,

    #[arg(
        short = 'T',
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "no-redirects",
        global = true,
        help_heading = "HTTP",
        help = "Do not follow HTTP redirects."
    )]
    pub no_redirects: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage clinics.
    #[command(visible_alias = "clinics")]
    Clinicas {
        #[command(subcommand)]
        action: Action,
    },

    /// Manage ratings.
    Ratings {
        #[command(subcommand)]
        action: Action,
    },

    /// Manage products.
    #[command(visible_alias = "products")]
    Productos {
        #[command(subcommand)]
        action: Action,
    },

    /// Print the site header and footer markup.
    Chrome,

    /// Write a commented default config file.
    InitConfig,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Action {
    /// List the collection, or a scoped view such as '?id_clinica=12'.
    List {
        #[arg(short = 'q', long = "query", value_name = "QUERY")]
        query: Option<String>,
    },

    /// Load one record into the edit form, e.g. --query '?id=7'.
    Show {
        #[arg(short = 'q', long = "query", value_name = "QUERY")]
        query: String,
    },

    /// Filter the list by name; an empty term lists everything.
    Search {
        #[arg(value_name = "TERM", default_value = "")]
        term: String,
    },

    /// Create a record from field assignments.
    Create {
        #[arg(short = 's', long = "set", value_name = "FIELD=VALUE", action = ArgAction::Append)]
        set: Vec<String>,
    },

    /// Load a record, apply field assignments and save it.
    Update {
        #[arg(short = 'q', long = "query", value_name = "QUERY")]
        query: String,

        #[arg(short = 's', long = "set", value_name = "FIELD=VALUE", action = ArgAction::Append)]
        set: Vec<String>,
    },

    /// Delete a record and list the collection again.
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}
