//! Command-line surface for `blog-admin`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use blog_admin::config::GlobalOverrides;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blog-admin", version, about = "Blog administration console", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the current session
    Whoami {
        #[arg(long)]
        json: bool,
    },
    /// Post, category and comment counters
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Category management
    Categories(CategoriesArgs),
    /// Blog post management
    Blogs(BlogsArgs),
    /// Comment moderation
    Comments(CommentsArgs),
    /// Image uploads for post content
    Uploads(UploadsArgs),
    /// Check whether a console path would render or redirect to login
    Route { path: String },
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long, env = "BLOG_ADMIN_USERNAME")]
    pub username: Option<String>,

    /// Read the password from a file instead of prompting
    #[arg(long)]
    pub password_file: Option<PathBuf>,

    /// Password from env (no CLI flag so it stays out of shell history)
    #[arg(hide = true, long = "password-env", env = "BLOG_ADMIN_PASSWORD")]
    pub password_env: Option<String>,
}

/// Shared options of every list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Case-insensitive text filter
    #[arg(long, default_value = "")]
    pub search: String,
    /// Status filter (comments: all|pending|approved, blogs: all|published|draft)
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub json: bool,
}

/// Ids of the rows to act on, plus the confirmation bypass.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    List(ListArgs),
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        meta_title: String,
        #[arg(long, default_value = "")]
        meta_description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        meta_title: Option<String>,
        #[arg(long)]
        meta_description: Option<String>,
    },
    Delete(TargetArgs),
}

#[derive(Parser, Debug)]
pub struct BlogsArgs {
    #[command(subcommand)]
    pub action: BlogsCmd,
}

#[derive(Subcommand, Debug)]
pub enum BlogsCmd {
    List(ListArgs),
    Show { id: String },
    Create(BlogCreateArgs),
    Update(BlogUpdateArgs),
    Delete(TargetArgs),
}

#[derive(Args, Debug)]
pub struct BlogCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub posted_by: String,
    /// Category id
    #[arg(long)]
    pub category: String,
    #[arg(long, default_value = "")]
    pub meta_title: String,
    #[arg(long, default_value = "")]
    pub meta_description: String,
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    #[arg(long)]
    pub published: bool,
    #[arg(long, conflicts_with = "schema_file")]
    pub schema_markup: Option<String>,
    #[arg(long)]
    pub schema_file: Option<PathBuf>,
    /// Homepage placement, repeatable (top_new, most_popular, editors_pick, ...)
    #[arg(long = "section")]
    pub sections: Vec<String>,
    #[arg(long)]
    pub main_image: PathBuf,
}

#[derive(Args, Debug)]
pub struct BlogUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub posted_by: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub meta_title: Option<String>,
    #[arg(long)]
    pub meta_description: Option<String>,
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    #[arg(long)]
    pub published: Option<bool>,
    #[arg(long, conflicts_with = "schema_file")]
    pub schema_markup: Option<String>,
    #[arg(long)]
    pub schema_file: Option<PathBuf>,
    /// Replace the homepage placements (repeatable)
    #[arg(long = "section")]
    pub sections: Vec<String>,
    /// Remove every homepage placement
    #[arg(long, conflicts_with = "sections")]
    pub clear_sections: bool,
    /// Replace the main image
    #[arg(long)]
    pub main_image: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub action: CommentsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CommentsCmd {
    List(ListArgs),
    Approve {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    Delete(TargetArgs),
}

#[derive(Parser, Debug)]
pub struct UploadsArgs {
    #[command(subcommand)]
    pub action: UploadsCmd,
}

#[derive(Subcommand, Debug)]
pub enum UploadsCmd {
    /// Upload an image and print its URL
    Image { file: PathBuf },
}
