use clap::{Parser, Subcommand};

/// Command-line interface definition for geoattend
/// Geofenced attendance check-in backed by SQLite
#[derive(Parser)]
#[command(
    name = "geoattend",
    version = env!("CARGO_PKG_VERSION"),
    about = "Geofenced attendance: confirm a venue, share a check-in link, verify every check-in",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Manage the database schema
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "info", help = "Show applied migrations")]
        info: bool,
    },

    /// Create an event
    Create {
        /// Event title
        title: String,

        #[arg(long, help = "Check-in radius in meters (10-1000, default from config)")]
        radius: Option<i64>,

        #[arg(long, help = "Organizer id")]
        lead: Option<String>,

        #[arg(long, help = "Free-text description")]
        description: Option<String>,
    },

    /// Show an event's location and link state
    Show {
        event_id: i64,
    },

    /// Confirm (or re-confirm) the venue's GPS reference point
    Confirm {
        event_id: i64,

        #[arg(long, allow_negative_numbers = true, help = "Latitude in decimal degrees")]
        lat: f64,

        #[arg(long, allow_negative_numbers = true, help = "Longitude in decimal degrees")]
        lng: f64,

        #[arg(long, help = "Reported GPS accuracy in meters")]
        accuracy: f64,
    },

    /// Generate a check-in link, replacing any previous one
    Link {
        event_id: i64,

        #[arg(long, help = "Link lifetime in seconds (default from config: 24h)")]
        ttl: Option<i64>,
    },

    /// Resolve a check-in token to its event
    Resolve {
        token: String,
    },

    /// Submit a check-in
    Checkin {
        /// Token from the shared link
        #[arg(required_unless_present = "event", conflicts_with = "event")]
        token: Option<String>,

        #[arg(long, help = "Check in by event id instead of token")]
        event: Option<i64>,

        #[arg(long, allow_negative_numbers = true, help = "Latitude in decimal degrees")]
        lat: f64,

        #[arg(long, allow_negative_numbers = true, help = "Longitude in decimal degrees")]
        lng: f64,

        #[arg(long, help = "Reported GPS accuracy in meters")]
        accuracy: f64,

        #[arg(long, help = "Attendee id (omit for anonymous check-in)")]
        user: Option<String>,

        #[arg(long, requires = "user", help = "Student number of the attendee")]
        student: Option<String>,

        #[arg(long, help = "Device description (user agent)")]
        device: Option<String>,
    },

    /// List attendance records, newest first
    List {
        /// Event to list
        #[arg(required_unless_present = "user", conflicts_with = "user")]
        event_id: Option<i64>,

        #[arg(long, help = "List one attendee's records across events")]
        user: Option<String>,

        #[arg(long, help = "Print records as JSON")]
        json: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
