#![deny(clippy::all, clippy::pedantic)]

use blog_admin::{
    application::{
        blogs::{BlogService, PublishStatus, blog_list},
        error::AppError,
        list::RowAction,
    },
    domain::{
        forms::{BlogChanges, BlogDraft},
        routes::Route,
    },
};
use blog_admin_types::{Blog, Section};

use crate::args::{BlogCreateArgs, BlogUpdateArgs, BlogsCmd};
use crate::context::Console;
use crate::handlers::list;
use crate::io::read_opt_value;
use crate::print::{clip, print_json};

const HEADERS: &[&str] = &["ID", "Title", "Author", "Category", "Status", "Sections"];

pub async fn handle(console: &Console, cmd: BlogsCmd) -> Result<(), AppError> {
    let service = BlogService::new(console.client.clone());
    match cmd {
        BlogsCmd::List(args) => {
            console.require(Route::Blogs).await?;
            let status = PublishStatus::parse_filter(args.status.as_deref())?;
            let mut blogs = blog_list(console.client.clone(), console.settings.lists.blogs_page_size);
            list::show(&mut blogs, &args, status, HEADERS, render).await
        }
        BlogsCmd::Show { id } => {
            console.require(Route::BlogEdit(id.clone())).await?;
            let blog = service.find(&id).await?;
            print_json(&blog)
        }
        BlogsCmd::Create(args) => {
            console.require(Route::BlogCreate).await?;
            let draft = create_draft(args)?;
            let created = service.create(&draft).await?;
            report("Blog created.", created.as_ref())
        }
        BlogsCmd::Update(args) => {
            let id = args.id.clone();
            console.require(Route::BlogEdit(id.clone())).await?;
            let changes = update_changes(args)?;
            let updated = service.update(&id, changes).await?;
            report("Blog updated.", updated.as_ref())
        }
        BlogsCmd::Delete(target) => {
            console.require(Route::Blogs).await?;
            let mut blogs = blog_list(console.client.clone(), console.settings.lists.blogs_page_size);
            list::mutate(&mut blogs, RowAction::Delete, &target.ids, target.yes).await
        }
    }
}

fn create_draft(args: BlogCreateArgs) -> Result<BlogDraft, AppError> {
    Ok(BlogDraft {
        title: args.title,
        posted_by: args.posted_by,
        category_id: args.category,
        meta_title: args.meta_title,
        meta_description: args.meta_description,
        content_html: read_opt_value(args.content, args.content_file)?.unwrap_or_default(),
        published: args.published,
        schema_markup: read_opt_value(args.schema_markup, args.schema_file)?.unwrap_or_default(),
        sections: args.sections,
        main_image: Some(args.main_image),
    })
}

fn update_changes(args: BlogUpdateArgs) -> Result<BlogChanges, AppError> {
    let sections = if args.clear_sections {
        Some(Vec::new())
    } else if args.sections.is_empty() {
        None
    } else {
        Some(args.sections)
    };
    Ok(BlogChanges {
        title: args.title,
        posted_by: args.posted_by,
        category_id: args.category,
        meta_title: args.meta_title,
        meta_description: args.meta_description,
        content_html: read_opt_value(args.content, args.content_file)?,
        published: args.published,
        schema_markup: read_opt_value(args.schema_markup, args.schema_file)?,
        sections,
        main_image: args.main_image,
    })
}

fn report(message: &str, blog: Option<&Blog>) -> Result<(), AppError> {
    match blog {
        Some(blog) => print_json(blog),
        None => {
            println!("{message}");
            Ok(())
        }
    }
}

fn render(blog: &Blog) -> Vec<String> {
    let category = blog
        .category
        .as_ref()
        .map_or("-", |category| category.name().unwrap_or(category.id()));
    let status = if blog.published {
        PublishStatus::Published
    } else {
        PublishStatus::Draft
    };
    let sections = if blog.sections.is_empty() {
        "-".to_string()
    } else {
        blog.sections
            .iter()
            .map(|section| Section::label_for(section))
            .collect::<Vec<_>>()
            .join(", ")
    };
    vec![
        blog.id.clone(),
        clip(&blog.title, 40),
        blog.posted_by.clone().unwrap_or_else(|| "-".to_string()),
        clip(category, 24),
        status.as_str().to_string(),
        sections,
    ]
}
