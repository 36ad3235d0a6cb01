use super::CommandContext;
use crate::api::render_html;
use crate::cli::RenderArgs;
use crate::fs::{FileSystem, default_fs};
use crate::style;

pub fn cmd_render(args: RenderArgs) -> i32 {
    cmd_render_with_fs(args, default_fs())
}

pub fn cmd_render_with_fs(args: RenderArgs, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new(&args.input, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let html = match render_html(&ctx.dataset, &ctx.config, args.series) {
        Ok(html) => html,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    if let Err(e) = fs.write(&args.output, &html) {
        style::error(&format!("Failed to write export file: {}", e));
        return 1;
    }

    style::success(&format!(
        "Rendered {} years to {}",
        ctx.dataset.year_count(),
        style::path(&args.output)
    ));

    if args.open {
        if let Err(e) = open::that(&args.output) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DataArgs;
    use crate::fs::mock::MockFs;
    use crate::sync::SeriesKind;
    use std::path::{Path, PathBuf};

    fn args(data: &str) -> RenderArgs {
        RenderArgs {
            input: DataArgs {
                data: PathBuf::from(data),
                scenario: None,
                config: None,
            },
            output: PathBuf::from("/out/flows.html"),
            series: SeriesKind::Graph,
            open: false,
        }
    }

    #[test]
    fn test_render_writes_page() {
        let fs = MockFs::with_files([(
            Path::new("/run/flows.json"),
            r#"{"2000": {"node_index_to_data": {"0": {"process_id": "A"}}}}"#,
        )]);

        assert_eq!(cmd_render_with_fs(args("/run/flows.json"), &fs), 0);
        let html = fs.get(Path::new("/out/flows.html")).unwrap();
        assert!(html.contains("\"timeline\""));
    }

    #[test]
    fn test_render_fails_on_bad_data() {
        let fs = MockFs::with_files([(Path::new("/run/flows.json"), "{\"twothousand\": {}}")]);
        assert_eq!(cmd_render_with_fs(args("/run/flows.json"), &fs), 1);
        assert!(fs.get(Path::new("/out/flows.html")).is_none());
    }
}
