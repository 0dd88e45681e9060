//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extract metadata and download media from xiaohongshu share links.
#[derive(Parser, Debug)]
#[command(name = "xhs")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Working directory (database, settings.json, downloads)
    #[arg(short = 'w', long)]
    pub work_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract records from share links in the given text or stdin
    Extract {
        /// Text containing share links; stdin is read when omitted
        text: Vec<String>,

        /// Also download the referenced media files
        #[arg(short, long)]
        download: bool,
    },

    /// Watch the clipboard and process every link that appears
    Monitor {
        /// Clipboard polling delay in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Also download the referenced media files
        #[arg(short, long)]
        download: bool,
    },

    /// Check whether a work ID already has a completed download
    Check {
        /// Platform-assigned work ID
        work_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_extract_with_text_and_download() {
        let args = Args::try_parse_from([
            "xhs",
            "extract",
            "--download",
            "https://www.xiaohongshu.com/explore/abc123",
        ])
        .unwrap();
        match args.command {
            Command::Extract { text, download } => {
                assert_eq!(text, vec!["https://www.xiaohongshu.com/explore/abc123"]);
                assert!(download);
            }
            other => panic!("expected extract, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_extract_defaults_no_download() {
        let args = Args::try_parse_from(["xhs", "extract", "some text"]).unwrap();
        match args.command {
            Command::Extract { download, .. } => assert!(!download),
            other => panic!("expected extract, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_monitor_delay_flag() {
        let args = Args::try_parse_from(["xhs", "monitor", "--delay-ms", "250"]).unwrap();
        match args.command {
            Command::Monitor { delay_ms, download } => {
                assert_eq!(delay_ms, Some(250));
                assert!(!download);
            }
            other => panic!("expected monitor, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_check_requires_work_id() {
        let args = Args::try_parse_from(["xhs", "check", "abc123"]).unwrap();
        match args.command {
            Command::Check { work_id } => assert_eq!(work_id, "abc123"),
            other => panic!("expected check, got {other:?}"),
        }
        assert!(Args::try_parse_from(["xhs", "check"]).is_err());
    }

    #[test]
    fn test_cli_verbose_and_work_path() {
        let args =
            Args::try_parse_from(["xhs", "-vv", "-w", "/tmp/xhs", "extract", "text"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.work_path, Some(PathBuf::from("/tmp/xhs")));
    }

    #[test]
    fn test_cli_missing_subcommand_is_error() {
        let result = Args::try_parse_from(["xhs"]);
        assert!(result.is_err());
    }
}
