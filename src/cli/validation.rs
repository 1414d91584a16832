use crate::cli::args::{CliArgs, Command, RenderArgs, ServeArgs};
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(path) = args.config.as_deref() {
        if path.trim().is_empty() {
            return Err("invalid --config, expected a file path".to_string());
        }
    }
    match &args.command {
        Command::Serve(serve) => validate_serve(serve),
        Command::Render(render) => validate_render(render),
        Command::InitConfig => Ok(()),
    }
}

fn validate_serve(args: &ServeArgs) -> Result<(), String> {
    if let Some(host) = args.host.as_deref() {
        if host.trim().is_empty() {
            return Err("invalid --host, expected an address".to_string());
        }
    }
    if let Some(root) = args.root.as_deref() {
        if root.trim().is_empty() {
            return Err("invalid --root, expected a directory".to_string());
        }
    }
    Ok(())
}

fn validate_render(args: &RenderArgs) -> Result<(), String> {
    if let Some(raw) = args.format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --format '{raw}', expected text, json, or html"
            ));
        }
    }
    if let Some(data) = args.data.as_deref() {
        if data.trim().is_empty() {
            return Err("invalid --data, expected a path or URL".to_string());
        }
    }
    if let Some(output) = args.output.as_deref() {
        if output.trim().is_empty() {
            return Err("invalid --output, expected a file path".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn accepts_known_formats() {
        assert!(validate(&parse(&["orgdir", "render", "--format", "json"])).is_ok());
        assert!(validate(&parse(&["orgdir", "render", "--of", "HTML"])).is_ok());
    }

    #[test]
    fn rejects_unknown_format() {
        let err = validate(&parse(&["orgdir", "render", "--format", "xml"])).unwrap_err();
        assert!(err.contains("'xml'"));
    }

    #[test]
    fn rejects_blank_values() {
        assert!(validate(&parse(&["orgdir", "serve", "--host", " "])).is_err());
        assert!(validate(&parse(&["orgdir", "render", "--data", ""])).is_err());
        assert!(validate(&parse(&["orgdir", "--config", "", "init-config"])).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let args = parse(&["orgdir", "serve", "-vv", "--no-color", "--port", "8080"]);
        assert_eq!(args.verbose, 2);
        assert!(args.no_color);
        assert!(validate(&args).is_ok());
    }
}
