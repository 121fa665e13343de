#![allow(dead_code)]

pub mod config;
pub mod mock_replicate;
pub mod server;

/// Multipart image part as a browser would upload it
pub fn image_part(field_name: &str) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a])
        .file_name("bottle.png")
        .mime_str("image/png")
        .expect("valid mime");

    reqwest::multipart::Form::new().part(field_name.to_owned(), part)
}
