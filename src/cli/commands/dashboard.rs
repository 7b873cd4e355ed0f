use crate::cli::context::Context;
use crate::cli::utils::output_view;
use crate::cli::OutputFormat;
use crate::pages::DashboardPage;
use crate::render;

pub async fn handle(refresh: bool, ctx: &mut Context, output_format: OutputFormat) -> anyhow::Result<()> {
    let api = ctx.authorized_api()?;

    ctx.perf.start("dashboard");
    let page = DashboardPage::load(&mut ctx.cache, &api, refresh).await?;
    ctx.perf.checkpoint("dashboard", if page.snapshot.from_cache { "cache hit" } else { "fetched" });
    let cards = page.cards();
    ctx.perf.end("dashboard");

    output_view(&output_format, &cards, |cards| render::cards(cards))
}
