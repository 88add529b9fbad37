#![deny(clippy::all, clippy::pedantic)]

use blog_admin::{
    application::{error::AppError, uploads::upload_image},
    domain::routes::Route,
};

use crate::args::UploadsCmd;
use crate::context::Console;

pub async fn handle(console: &Console, cmd: UploadsCmd) -> Result<(), AppError> {
    match cmd {
        UploadsCmd::Image { file } => {
            console.require(Route::BlogCreate).await?;
            let uploaded = upload_image(&console.client, &file).await?;
            println!("{}", uploaded.url);
            Ok(())
        }
    }
}
