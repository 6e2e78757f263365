use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::{builder::BoolishValueParser, ArgAction, Parser, ValueEnum};

/// What `tgb` prints for a message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per entity: type, offset, length, covered text.
    Entities,
    Html,
    /// Normalized entity list as the API would receive it.
    Json,
}

/// Command line and `TGB_*` environment configuration.
///
/// Flags win over the environment; a `.env` file in the working directory
/// fills in variables that are not already set.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tgb",
    about = "Inspect the entities of a Telegram message payload",
    version
)]
pub struct Config {
    #[arg(
        env = "TGB_INPUT",
        value_name = "FILE",
        help = "Message JSON to read; omit or pass `-` for stdin"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        short,
        env = "TGB_FORMAT",
        value_enum,
        ignore_case = true,
        default_value = "entities",
        value_name = "FORMAT",
        help = "Output format"
    )]
    pub format: OutputFormat,

    #[arg(
        long,
        env = "TGB_URLED",
        action = ArgAction::Set,
        default_value_t = true,
        value_parser = BoolishValueParser::new(),
        value_name = "BOOL",
        help = "Render plain url entities as links in html output"
    )]
    pub urled: bool,
}

impl Config {
    pub fn load() -> Self {
        preload_dotenv(Path::new(".env"));
        Self::parse()
    }

    /// `None` means stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }
}

fn preload_dotenv(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };
    for (key, value) in dotenv_pairs(&contents) {
        if env::var_os(key).is_none() {
            env::set_var(key, value);
        }
    }
}

/// `KEY=value` lines of a `.env` file. Comments, blank lines and lines
/// without `=` are ignored; one layer of matching quotes is removed.
fn dotenv_pairs(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), unquote(value.trim())))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_input_and_format_flag() {
        let cfg = Config::try_parse_from(["tgb", "msg.json", "--format", "HTML"]).unwrap();
        assert_eq!(cfg.input_path(), Some(Path::new("msg.json")));
        assert_eq!(cfg.format, OutputFormat::Html);
    }

    #[test]
    fn dash_means_stdin() {
        let cfg = Config::try_parse_from(["tgb", "-", "-f", "json"]).unwrap();
        assert_eq!(cfg.input_path(), None);
        assert_eq!(cfg.format, OutputFormat::Json);
    }

    #[test]
    fn urled_accepts_boolish_values() {
        let cfg = Config::try_parse_from(["tgb", "--urled", "no"]).unwrap();
        assert!(!cfg.urled);
        let cfg = Config::try_parse_from(["tgb", "--urled", "1"]).unwrap();
        assert!(cfg.urled);
    }

    #[test]
    fn rejects_unknown_format_and_extra_args() {
        assert!(Config::try_parse_from(["tgb", "-", "--format", "xml"]).is_err());
        assert!(Config::try_parse_from(["tgb", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn dotenv_pairs_skip_noise_and_unquote() {
        let contents = "# comment\n\nTGB_FORMAT=\"html\"\nnot a pair\n =x\nTGB_INPUT = 'in.json'\nLONE=\"\n";
        assert_eq!(
            dotenv_pairs(contents),
            vec![
                ("TGB_FORMAT", "html"),
                ("TGB_INPUT", "in.json"),
                ("LONE", "\""),
            ]
        );
    }
}
