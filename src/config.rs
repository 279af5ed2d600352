use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub url: String,
    pub description: String,
    pub author: String,
}

#[derive(Deserialize)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Deserialize)]
pub struct Defaults {
    pub page_size: u32,
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,
    #[serde(default = "default_avatar")]
    pub default_avatar: String,
}

fn default_words_per_minute() -> u32 {
    200
}

fn default_avatar() -> String {
    "/public/avatar.png".to_string()
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent().ok_or_else(|| {
        io::Error::new(ErrorKind::NotFound, "Executable has no parent directory")
    })?;
    let str_path = path
        .to_str()
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidData, "Non UTF-8 path in configuration"))?;
    let exe_dir = exe_dir
        .to_str()
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidData, "Non UTF-8 executable path"))?;

    Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => {
            return Err(io::Error::new(
                e.kind(),
                format!(
                    "Error opening configuration file {}: {}",
                    cfg_path.display(),
                    e
                ),
            ))
        }
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Error parsing configuration file: {}", e),
            ))
        }
    };

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
    };

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
[site]
title = "folio"
url = "https://example.net"
description = "A portfolio and blog"
author = "mark"

[paths]
content_dir = "content"
public_dir = "public"

[defaults]
page_size = 10

[server]
address = "127.0.0.1"
port = 8085
"##;

    #[test]
    fn test_parse_with_defaults() {
        let cfg: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.site.title, "folio");
        assert_eq!(cfg.defaults.page_size, 10);
        assert_eq!(cfg.defaults.words_per_minute, 200);
        assert_eq!(cfg.defaults.default_avatar, "/public/avatar.png");
        assert!(cfg.log.is_none());
    }

    #[test]
    fn test_defaults_can_be_overridden() {
        let toml_str = SAMPLE.replace(
            "page_size = 10",
            "page_size = 5\nwords_per_minute = 120\ndefault_avatar = \"/public/logo.png\"",
        );
        let cfg: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(cfg.defaults.page_size, 5);
        assert_eq!(cfg.defaults.words_per_minute, 120);
        assert_eq!(cfg.defaults.default_avatar, "/public/logo.png");
    }

    #[test]
    fn test_exe_dir_expansion() {
        let expanded = parse_path(PathBuf::from("${exe_dir}/content")).unwrap();
        assert!(!expanded.starts_with("${exe_dir}"));
        assert!(expanded.ends_with("content"));
    }
}
