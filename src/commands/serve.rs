use super::CommandContext;
use crate::cli::ServeArgs;
use crate::fs::default_fs;
use crate::style;
use crate::sync::{Session, ViewSyncController};

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.input, default_fs()) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let controller = ViewSyncController::new(ctx.dataset, ctx.config).with_series_kind(args.series);
    let session = Session::new(controller);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    if let Err(e) = rt.block_on(crate::graph::serve(session, args.port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }
    0
}
