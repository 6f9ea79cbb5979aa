use std::time::Duration;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use serde_json::Value;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use lexicon_client::{
    CallOptions, Lexicon, ValidationMode, cli, config, error,
    normalize::SortEntry,
    resources::TrackQuery,
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name = "lexicon",
  bin_name = "lexicon",
  author = env!("CARGO_PKG_AUTHORS"),
  about = env!("CARGO_PKG_DESCRIPTION"),
  styles = styles(),
)]
struct Cli {
    /// How invalid input is handled: off, warn or strict
    #[clap(long, global = true, value_parser = utils::parse_validation_mode)]
    validation: Option<ValidationMode>,

    /// Request timeout in seconds
    #[clap(long, global = true)]
    timeout: Option<u64>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Work with library tracks
    #[command(subcommand)]
    Tracks(TracksCommand),

    /// Browse playlists and folders
    #[command(subcommand)]
    Playlists(PlaylistsCommand),

    /// Manage tags
    #[command(subcommand)]
    Tags(TagsCommand),

    /// List tag categories
    Categories,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Stop after this many tracks
    #[clap(long)]
    pub limit: Option<usize>,

    /// Skip this many tracks
    #[clap(long, default_value_t = 0)]
    pub offset: usize,

    /// Track source: non-archived, archived or incoming
    #[clap(long)]
    pub source: Option<String>,

    /// Fields to return, comma separated
    #[clap(long, value_delimiter = ',', conflicts_with = "all_fields")]
    pub fields: Vec<String>,

    /// Return every field
    #[clap(long)]
    pub all_fields: bool,

    /// Sort as field or field:asc|desc; can be repeated
    #[clap(long, value_parser = utils::parse_sort)]
    pub sort: Vec<SortEntry>,
}

impl QueryArgs {
    fn into_query(self) -> TrackQuery {
        let mut query = TrackQuery::new().offset(self.offset);
        if let Some(limit) = self.limit {
            query = query.limit(limit);
        }
        if let Some(source) = self.source {
            query = query.source(source);
        }
        if self.all_fields {
            query = query.all_fields();
        } else if !self.fields.is_empty() {
            query = query.fields(Value::from(self.fields));
        }
        if !self.sort.is_empty() {
            query = query.sort_by(&self.sort);
        }
        query
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TracksCommand {
    /// List tracks page by page
    List(QueryArgs),

    /// Search with field=value filters
    Search {
        /// Filters such as artist="Daft Punk" or bpm=120-128
        #[clap(value_parser = utils::parse_assignment, required = true)]
        filters: Vec<(String, Value)>,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show one track as JSON
    Get { id: i64 },

    /// Import files by location
    Add {
        #[clap(required = true)]
        locations: Vec<String>,
    },

    /// Edit a track with field=value pairs
    Update {
        id: i64,

        #[clap(value_parser = utils::parse_assignment, required = true)]
        edits: Vec<(String, Value)>,
    },

    /// Remove tracks from the library
    Delete {
        #[clap(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistsCommand {
    /// Print the playlist tree
    Tree,

    /// Show one playlist
    Get { id: i64 },

    /// Look a playlist up by folder path
    Path {
        #[clap(required = true)]
        components: Vec<String>,

        /// folder, playlist or smartlist
        #[clap(long = "type", default_value = "playlist")]
        playlist_type: String,
    },

    /// List the tracks of a playlist
    Tracks { id: i64 },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TagsCommand {
    /// List tags with their category
    List,

    /// Create a tag
    Add {
        #[clap(long)]
        category: i64,
        label: String,
    },

    /// Delete tags
    Delete {
        #[clap(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let mut opts = CallOptions::new(cli.validation.unwrap_or_else(config::validation_mode));
    if let Some(secs) = cli.timeout {
        opts = opts.with_timeout(Duration::from_secs(secs));
    }

    let lexicon = match Lexicon::from_config() {
        Ok(lexicon) => lexicon,
        Err(e) => error!("Cannot create Lexicon client. Err: {}", e),
    };

    match cli.command {
        Command::Tracks(command) => match command {
            TracksCommand::List(query) => {
                cli::list_tracks(&lexicon, query.into_query(), opts).await
            }
            TracksCommand::Search { filters, query } => {
                cli::search_tracks(&lexicon, &filters, query.into_query(), opts).await
            }
            TracksCommand::Get { id } => cli::show_track(&lexicon, id, opts).await,
            TracksCommand::Add { locations } => cli::add_tracks(&lexicon, &locations, opts).await,
            TracksCommand::Update { id, edits } => {
                cli::update_track(&lexicon, id, &edits, opts).await
            }
            TracksCommand::Delete { ids } => cli::delete_tracks(&lexicon, &ids, opts).await,
        },

        Command::Playlists(command) => match command {
            PlaylistsCommand::Tree => cli::playlist_tree(&lexicon, opts).await,
            PlaylistsCommand::Get { id } => cli::show_playlist(&lexicon, id, opts).await,
            PlaylistsCommand::Path {
                components,
                playlist_type,
            } => cli::playlist_by_path(&lexicon, &components, &playlist_type, opts).await,
            PlaylistsCommand::Tracks { id } => cli::playlist_tracks(&lexicon, id, opts).await,
        },

        Command::Tags(command) => match command {
            TagsCommand::List => cli::list_tags(&lexicon, opts).await,
            TagsCommand::Add { category, label } => {
                cli::add_tag(&lexicon, category, &label, opts).await
            }
            TagsCommand::Delete { ids } => cli::delete_tags(&lexicon, &ids, opts).await,
        },

        Command::Categories => cli::list_categories(&lexicon, opts).await,
        Command::Completions(_) => {}
    }
}
