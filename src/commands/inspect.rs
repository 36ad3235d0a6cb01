use super::CommandContext;
use crate::api::inspect;
use crate::cli::InspectArgs;
use crate::fs::{FileSystem, default_fs};
use crate::model::Year;
use crate::style;

pub fn cmd_inspect(args: InspectArgs) -> i32 {
    cmd_inspect_with_fs(args, default_fs())
}

pub fn cmd_inspect_with_fs(args: InspectArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new(&args.input, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let markdown = match inspect(&ctx.dataset, &ctx.config, args.year.map(Year)) {
        Ok(md) => md,
        Err(e) => {
            style::error(&e.to_string());
            let years: Vec<String> = ctx.dataset.years().iter().map(|y| y.to_string()).collect();
            style::hint(&format!("Available years: {}", years.join(", ")));
            return 1;
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = fs.write(&path, &markdown) {
                style::error(&format!("Failed to write output: {}", e));
                return 1;
            }
            style::success(&format!("Summary written to {}", style::path(&path)));
        }
        None => {
            if style::is_terminal() {
                style::render_markdown_to_terminal(&markdown);
            } else {
                print!("{}", markdown);
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DataArgs;
    use crate::fs::mock::MockFs;
    use std::path::{Path, PathBuf};

    fn args(year: Option<i32>) -> InspectArgs {
        InspectArgs {
            input: DataArgs {
                data: PathBuf::from("/run/flows.json"),
                scenario: None,
                config: None,
            },
            year,
            output: Some(PathBuf::from("/out/summary.md")),
        }
    }

    #[test]
    fn test_inspect_writes_summary() {
        let fs = MockFs::with_files([(
            Path::new("/run/flows.json"),
            r#"{"2000": {"node_index_to_data": {"0": {"process_id": "A"}}}}"#,
        )]);

        assert_eq!(cmd_inspect_with_fs(args(Some(2000)), &fs), 0);
        let md = fs.get(Path::new("/out/summary.md")).unwrap();
        assert!(md.contains("| A | A |"));

        assert_eq!(cmd_inspect_with_fs(args(Some(1999)), &fs), 1);
    }
}
