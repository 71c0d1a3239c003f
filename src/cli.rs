use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "digitalhub",
    version,
    about = "Browse premium digital services and order them over WhatsApp"
)]
pub struct Args {
    /// Catalog JSON file to load instead of the bundled one
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Service id whose plans are shown on start (e.g., "netflix")
    #[arg(short, long)]
    pub service: Option<String>,

    /// Theme name (e.g., "Catppuccin Latte")
    #[arg(short, long)]
    pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_flags() {
        let args = Args::parse_from([
            "digitalhub",
            "--catalog",
            "store.json",
            "-s",
            "netflix",
            "--theme",
            "Catppuccin Frappe",
        ]);
        assert_eq!(args.catalog, Some(PathBuf::from("store.json")));
        assert_eq!(args.service.as_deref(), Some("netflix"));
        assert_eq!(args.theme.as_deref(), Some("Catppuccin Frappe"));
    }

    #[test]
    fn test_no_flags() {
        let args = Args::parse_from(["digitalhub"]);
        assert!(args.catalog.is_none());
        assert!(args.service.is_none());
    }
}
