//! Subcommand implementations.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use dram_client::ClassifierClient;
use dram_flow::{AcquisitionFlow, FlowConfig, ResultPanel, ResultView};
use dram_models::{format_usd, Catalog, Gallery, GalleryEntry};
use tracing::{error, info};

/// Acquire `path` through the flow, submit it once, and print the result.
pub async fn classify(path: &Path) -> Result<()> {
    let client = ClassifierClient::from_env().context("invalid classifier configuration")?;
    info!(endpoint = %client.endpoint(), "Classifier configured");

    let mut flow = AcquisitionFlow::new(FlowConfig::from_env());
    if let Err(e) = flow.acquire_from_path(path).await {
        error!(path = %path.display(), "{}", e);
        return Err(anyhow!(e.user_message()));
    }

    if let Err(e) = flow.submit(&client).await {
        error!("{}", e);
    }

    match flow.result_panel() {
        ResultPanel::Result(view) => {
            print!("{}", render_result(&view));
            Ok(())
        }
        ResultPanel::Error(message) => Err(anyhow!(message)),
        other => Err(anyhow!("unexpected flow state {:?}", other)),
    }
}

/// Load a catalog, apply search/filter/selection, and print it.
pub async fn gallery(
    path: &Path,
    search: &str,
    spirit_type: Option<String>,
    select: Option<u64>,
) -> Result<()> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let catalog = Catalog::from_json(&json).context("invalid catalog")?;

    let mut gallery = Gallery::new(catalog);
    gallery.set_search(search);
    gallery.set_type_filter(spirit_type);
    if let Some(id) = select {
        if gallery.select(id).is_none() {
            info!(id, "Selected bottle is not in the current view");
        }
    }

    print!("{}", render_gallery(&gallery));
    Ok(())
}

pub fn render_result(view: &ResultView) -> String {
    let mut out = String::new();
    let band = view
        .confidence_band
        .map(|b| format!(" ({})", b))
        .unwrap_or_default();

    let _ = writeln!(out, "{}  [{}]", view.name, view.spirit_type);
    let _ = writeln!(out, "  Confidence: {}{}", view.confidence_label(), band);
    let _ = writeln!(out, "  ABV:        {}", view.abv.as_deref().unwrap_or("n/a"));
    let _ = writeln!(out, "  Proof:      {}", view.proof.as_deref().unwrap_or("n/a"));
    let _ = writeln!(out, "  Size:       {}", view.size);
    let _ = writeln!(out, "  Popularity: {}", view.popularity.as_deref().unwrap_or("n/a"));
    let _ = writeln!(out, "  Avg price:  {}", view.price.as_deref().unwrap_or("n/a"));
    if !view.similar.is_empty() {
        let _ = writeln!(out, "  Similar:    {}", view.similar.join(", "));
    }
    out
}

pub fn render_gallery(gallery: &Gallery) -> String {
    let mut out = String::new();
    let visible = gallery.visible();

    let _ = writeln!(
        out,
        "Types: {}",
        gallery.catalog().spirit_types().join(" | ")
    );
    if visible.is_empty() {
        let _ = writeln!(out, "No whiskies found. Try adjusting your search or filter.");
    }
    for entry in &visible {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:<20} {:>5}%  {:>10}",
            entry.id,
            entry.name,
            entry.spirit_type,
            entry.abv,
            format_usd(entry.price)
        );
    }
    if let Some(entry) = gallery.selected() {
        out.push_str(&render_detail(entry));
    }
    out
}

fn render_detail(entry: &GalleryEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", entry.name);
    let _ = writeln!(out, "  Type:   {}", entry.spirit_type);
    let _ = writeln!(out, "  Region: {}", entry.region);
    let _ = writeln!(out, "  ABV:    {}%", entry.abv);
    let _ = writeln!(out, "  Price:  {}", format_usd(entry.price));
    if !entry.image_url.is_empty() {
        let _ = writeln!(out, "  Image:  {}", entry.image_url);
    }
    out
}
