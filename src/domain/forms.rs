//! Editable drafts behind the category and blog forms.

use std::path::PathBuf;

use blog_admin_types::{Blog, Category, CategoryPayload, Section};

use super::error::ValidationError;

const FILL_REQUIRED: &str = "Fill all required fields";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub meta_title: String,
    pub meta_description: String,
}

impl CategoryDraft {
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            meta_title: category.meta_title.clone().unwrap_or_default(),
            meta_description: category.meta_description.clone().unwrap_or_default(),
        }
    }

    pub fn into_payload(self) -> Result<CategoryPayload, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::required("name"));
        }
        Ok(CategoryPayload {
            name: name.to_string(),
            meta_title: self.meta_title,
            meta_description: self.meta_description,
        })
    }
}

/// Field values of the blog create/edit form, excluding the HTML editor itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub posted_by: String,
    pub category_id: String,
    pub meta_title: String,
    pub meta_description: String,
    pub content_html: String,
    pub published: bool,
    pub schema_markup: String,
    pub sections: Vec<String>,
    pub main_image: Option<PathBuf>,
}

/// Partial edit applied on top of the stored blog.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub posted_by: Option<String>,
    pub category_id: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub content_html: Option<String>,
    pub published: Option<bool>,
    pub schema_markup: Option<String>,
    pub sections: Option<Vec<String>>,
    pub main_image: Option<PathBuf>,
}

impl BlogDraft {
    pub fn from_blog(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            posted_by: blog.posted_by.clone().unwrap_or_default(),
            category_id: blog
                .category
                .as_ref()
                .map(|category| category.id().to_string())
                .unwrap_or_default(),
            meta_title: blog.meta_title.clone().unwrap_or_default(),
            meta_description: blog.meta_description.clone().unwrap_or_default(),
            content_html: blog.content_html.clone().unwrap_or_default(),
            published: blog.published,
            schema_markup: blog.schema_markup.clone().unwrap_or_default(),
            sections: blog.sections.clone(),
            main_image: None,
        }
    }

    pub fn apply(&mut self, changes: BlogChanges) {
        let BlogChanges {
            title,
            posted_by,
            category_id,
            meta_title,
            meta_description,
            content_html,
            published,
            schema_markup,
            sections,
            main_image,
        } = changes;

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = posted_by {
            self.posted_by = value;
        }
        if let Some(value) = category_id {
            self.category_id = value;
        }
        if let Some(value) = meta_title {
            self.meta_title = value;
        }
        if let Some(value) = meta_description {
            self.meta_description = value;
        }
        if let Some(value) = content_html {
            self.content_html = value;
        }
        if let Some(value) = published {
            self.published = value;
        }
        if let Some(value) = schema_markup {
            self.schema_markup = value;
        }
        if let Some(value) = sections {
            self.sections = value;
        }
        if main_image.is_some() {
            self.main_image = main_image;
        }
    }

    /// New posts need every required field plus a main image.
    pub fn validate_for_create(&self) -> Result<(), ValidationError> {
        self.validate_common()?;
        if self.main_image.is_none() {
            return Err(ValidationError::new("mainImage", FILL_REQUIRED));
        }
        Ok(())
    }

    /// Edits keep the stored image unless a replacement is attached.
    pub fn validate_for_update(&self) -> Result<(), ValidationError> {
        self.validate_common()
    }

    fn validate_common(&self) -> Result<(), ValidationError> {
        let required = [
            ("title", &self.title),
            ("postedBy", &self.posted_by),
            ("categoryId", &self.category_id),
            ("contentHtml", &self.content_html),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::new(*field, FILL_REQUIRED));
        }
        if let Some(unknown) = self.sections.iter().find(|s| Section::parse(s).is_none()) {
            return Err(ValidationError::new(
                "sections",
                format!("unknown homepage section `{unknown}`"),
            ));
        }
        Ok(())
    }

    /// Text parts of the multipart body, in the order the service expects.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("postedBy", self.posted_by.clone()),
            ("categoryId", self.category_id.clone()),
            ("metaTitle", self.meta_title.clone()),
            ("metaDescription", self.meta_description.clone()),
            ("contentHtml", self.content_html.clone()),
            ("published", self.published.to_string()),
            ("schemaMarkup", self.schema_markup.clone()),
            (
                "sections",
                serde_json::Value::from(self.sections.clone()).to_string(),
            ),
        ]
    }
}
