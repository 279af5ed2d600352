use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::{fs, io};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::ImageFormat;
use spdlog::warn;

const IMAGE_EXTENSIONS: &[&str] = &["webp", "png", "jpg", "jpeg"];

/// Bounding box of the blurred preview, in pixels.
const BLUR_BOX: u32 = 24;
const BLUR_SIGMA: f32 = 1.5;

/// Album directories under the media root that contain at least one
/// image, name-sorted.
pub fn list_albums(media_dir: &Path) -> io::Result<Vec<String>> {
    let mut albums = vec![];
    for dir_entry in fs::read_dir(media_dir)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = dir_entry.file_name().to_str().map(|name| name.to_string()) else {
            continue;
        };
        if !album_images(media_dir, &name)?.is_empty() {
            albums.push(name);
        }
    }

    albums.sort();
    Ok(albums)
}

/// Image files of one album, name-sorted. The album banner is display
/// chrome, not album content, so it is excluded.
pub fn album_images(media_dir: &Path, album: &str) -> io::Result<Vec<PathBuf>> {
    let album_dir = media_dir.join(album);
    if !album_dir.is_dir() {
        return Ok(vec![]);
    }

    let mut images = vec![];
    for dir_entry in fs::read_dir(&album_dir)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_file() {
            continue;
        }
        let path = dir_entry.path();
        if is_image(&path) && !is_banner(&path) {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

pub fn photo_count(media_dir: &Path, album: &str) -> io::Result<usize> {
    Ok(album_images(media_dir, album)?.len())
}

/// Tiny blurred preview of an image as a base64 JPEG data URL,
/// suitable for an inline placeholder while the full asset loads.
/// Undecodable input degrades to an empty string.
pub fn blur_placeholder(bytes: &[u8]) -> String {
    match generate_blur(bytes) {
        Ok(data_url) => data_url,
        Err(e) => {
            warn!("Error generating blur placeholder: {}", e);
            String::new()
        }
    }
}

fn generate_blur(bytes: &[u8]) -> Result<String, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    let small = img.resize(BLUR_BOX, BLUR_BOX, FilterType::Triangle).blur(BLUR_SIGMA);

    let mut buf = Cursor::new(Vec::new());
    small.to_rgb8().write_to(&mut buf, ImageFormat::Jpeg)?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        BASE64.encode(buf.get_ref())
    ))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn is_banner(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.eq_ignore_ascii_case("banner"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_and_banner_checks() {
        assert!(is_image(Path::new("a/shot.JPG")));
        assert!(is_image(Path::new("a/shot.webp")));
        assert!(!is_image(Path::new("a/notes.md")));

        assert!(is_banner(Path::new("a/banner.jpg")));
        assert!(is_banner(Path::new("a/Banner.png")));
        assert!(!is_banner(Path::new("a/sunset.jpg")));
    }

    #[test]
    fn test_album_scanning() -> io::Result<()> {
        let tmp = tempfile::tempdir()?;
        let album = tmp.path().join("tokyo-walk");
        fs::create_dir_all(&album)?;
        fs::write(album.join("b-street.jpg"), "x")?;
        fs::write(album.join("a-crossing.png"), "x")?;
        fs::write(album.join("banner.jpg"), "x")?;
        fs::write(album.join("notes.md"), "x")?;
        fs::create_dir_all(tmp.path().join("empty-album"))?;

        let albums = list_albums(tmp.path())?;
        assert_eq!(albums, ["tokyo-walk"]);

        let images = album_images(tmp.path(), "tokyo-walk")?;
        let names: Vec<&str> = images
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, ["a-crossing.png", "b-street.jpg"]);

        assert_eq!(photo_count(tmp.path(), "tokyo-walk")?, 2);
        assert_eq!(photo_count(tmp.path(), "no-such-album")?, 0);
        Ok(())
    }

    #[test]
    fn test_blur_placeholder_of_invalid_bytes_is_empty() {
        assert_eq!(blur_placeholder(b"definitely not an image"), "");
    }

    #[test]
    fn test_blur_placeholder_of_generated_image() {
        // A 64x48 solid-color PNG produced in memory
        let mut png = Cursor::new(Vec::new());
        let img = image::RgbImage::from_pixel(64, 48, image::Rgb([120, 30, 200]));
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut png, ImageFormat::Png)
            .unwrap();

        let data_url = blur_placeholder(png.get_ref());
        assert!(data_url.starts_with("data:image/jpeg;base64,"));

        let decoded = BASE64
            .decode(data_url.trim_start_matches("data:image/jpeg;base64,"))
            .unwrap();
        let preview = image::load_from_memory(&decoded).unwrap();
        assert!(preview.width() <= BLUR_BOX && preview.height() <= BLUR_BOX);
    }
}
