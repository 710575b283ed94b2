mod common;

use common::fixtures::*;
use common::{TestResult, generate_deck};
use deckforge::types::{
    AssetKind, AssetRequest, AssetSource, LayoutVariant, NotesMap, Parameters, ProviderId,
    ResolutionOutcome, SlideSpec, UnresolvedReason,
};
use deckforge::{PipelineBuilder, ProviderError};
use std::time::Duration;

#[tokio::test]
async fn test_identical_requests_reach_provider_once() -> TestResult {
    let dir = tempfile::tempdir()?;
    let charts = CountingProvider::new();
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("charts", charts.clone())
        .with_chain(AssetKind::Chart, ["charts"])
        .with_max_concurrency(4)
        .build()?;

    let slides = vec![
        revenue_slide(dir.path()),
        revenue_slide(dir.path()),
        SlideSpec::new("Recap").with_asset(chart_request(dir.path(), "revenue")),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    assert_eq!(charts.calls(), 1);
    assert_eq!(deck.report.cache.misses, 1);
    assert_eq!(deck.report.cache.hits, 2);
    assert_eq!(deck.report.resolved_assets(), 3);
    Ok(())
}

#[tokio::test]
async fn test_chain_stops_at_first_success() -> TestResult {
    let dir = tempfile::tempdir()?;
    let first = FailingProvider::new(ProviderError::Unavailable("quota exceeded".into()));
    let second = CountingProvider::new();
    let third = CountingProvider::new();
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("p1", first.clone())
        .with_shared_provider("p2", second.clone())
        .with_shared_provider("p3", third.clone())
        .with_chain(AssetKind::Chart, ["p1", "p2", "p3"])
        .build()?;

    let slides = vec![revenue_slide(dir.path())];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    let asset = &deck.report.slides[0].assets[0];
    assert_eq!(asset.provider, Some(ProviderId::new("p2")));
    assert_eq!(asset.attempts.len(), 1);
    assert_eq!(asset.attempts[0].provider, ProviderId::new("p1"));
    assert!(asset.attempts[0].failure.contains("quota exceeded"));
    assert_eq!(third.calls(), 0);
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);
    assert!(deck.path("assets/revenue.png").exists());
    Ok(())
}

#[tokio::test]
async fn test_exhausted_chain_degrades_to_text_only() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("p1", FailingProvider::new(ProviderError::NotFound("bar".into())))
        .with_shared_provider("p2", FailingProvider::new(ProviderError::EmptyResponse))
        .with_chain(AssetKind::Chart, ["p1", "p2"])
        .build()?;

    let slides = vec![revenue_slide(dir.path())];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    let slide = &deck.report.slides[0];
    assert_eq!(slide.variant, LayoutVariant::TextOnly);
    assert_eq!(
        slide.assets[0].outcome,
        ResolutionOutcome::Unresolved {
            reason: UnresolvedReason::ChainExhausted
        }
    );
    assert_eq!(slide.assets[0].attempts.len(), 2);
    assert_eq!(deck.report.unresolved_assets(), 1);

    let doc = deck.document();
    assert!(!doc.descendants().any(|n| n.tag_name().name() == "pic"));
    assert!(!deck.path("assets/revenue.png").exists());
    Ok(())
}

#[tokio::test]
async fn test_hanging_provider_times_out_and_chain_continues() -> TestResult {
    let dir = tempfile::tempdir()?;
    let fallback = CountingProvider::new();
    let pipeline = PipelineBuilder::new()
        .with_provider("slow", HangingProvider)
        .with_shared_provider("fallback", fallback.clone())
        .with_chain(AssetKind::Chart, ["slow", "fallback"])
        .with_provider_timeout(Duration::from_millis(50))
        .build()?;

    let slides = vec![revenue_slide(dir.path())];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    let asset = &deck.report.slides[0].assets[0];
    assert_eq!(asset.provider, Some(ProviderId::new("fallback")));
    assert_eq!(asset.attempts[0].failure, "Timed out after 50 ms");
    assert_eq!(fallback.calls(), 1);
    assert_eq!(deck.report.slides[0].variant, LayoutVariant::TextWithAsset);
    Ok(())
}

#[tokio::test]
async fn test_kind_without_chain_is_unresolved() -> TestResult {
    let dir = tempfile::tempdir()?;
    let charts = CountingProvider::new();
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("charts", charts.clone())
        .with_chain(AssetKind::Chart, ["charts"])
        .build()?;

    let slides = vec![
        SlideSpec::new("Team")
            .with_content(["Meet the team"])
            .with_asset(avatar_request(dir.path(), "ada")),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    let slide = &deck.report.slides[0];
    assert_eq!(
        slide.assets[0].outcome,
        ResolutionOutcome::Unresolved {
            reason: UnresolvedReason::NoChainConfigured
        }
    );
    assert!(slide.assets[0].attempts.is_empty());
    assert_eq!(slide.variant, LayoutVariant::TextOnly);
    assert_eq!(charts.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_existing_file_is_reused_without_provider_call() -> TestResult {
    let dir = tempfile::tempdir()?;
    let request = chart_request(dir.path(), "revenue");
    std::fs::create_dir_all(request.target_path().parent().unwrap_or(dir.path()))?;
    std::fs::write(request.target_path(), FAKE_PNG)?;

    let charts = CountingProvider::new();
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("charts", charts.clone())
        .with_chain(AssetKind::Chart, ["charts"])
        .with_reuse_existing_assets(true)
        .build()?;

    let slides = vec![revenue_slide(dir.path())];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    assert_eq!(charts.calls(), 0);
    assert_eq!(
        deck.report.slides[0].assets[0].outcome,
        ResolutionOutcome::Resolved {
            path: deck.path("assets/revenue.png"),
            source: AssetSource::ExistingFile,
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_existing_file_ignored_when_reuse_disabled() -> TestResult {
    let dir = tempfile::tempdir()?;
    let request = chart_request(dir.path(), "revenue");
    std::fs::create_dir_all(dir.path().join("assets"))?;
    std::fs::write(request.target_path(), b"stale")?;

    let charts = CountingProvider::new();
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("charts", charts.clone())
        .with_chain(AssetKind::Chart, ["charts"])
        .build()?;

    let slides = vec![revenue_slide(dir.path())];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    assert_eq!(charts.calls(), 1);
    assert_eq!(std::fs::read(deck.path("assets/revenue.png"))?, FAKE_PNG);
    Ok(())
}

#[tokio::test]
async fn test_two_resolved_avatars_form_a_grid() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("avatars", CountingProvider::new())
        .with_chain(AssetKind::Avatar, ["avatars"])
        .build()?;

    let slides = vec![
        SlideSpec::new("Team")
            .with_content(["Founders"])
            .with_asset(avatar_request(dir.path(), "ada"))
            .with_asset(avatar_request(dir.path(), "grace")),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    assert_eq!(deck.report.slides[0].variant, LayoutVariant::Grid);
    let pictures = deck
        .document()
        .descendants()
        .filter(|n| n.tag_name().name() == "pic")
        .count();
    assert_eq!(pictures, 2);
    Ok(())
}

#[tokio::test]
async fn test_unwritable_target_degrades_slide() -> TestResult {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("file.txt"), b"not a directory")?;

    let charts = CountingProvider::new();
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("charts", charts.clone())
        .with_chain(AssetKind::Chart, ["charts"])
        .build()?;

    let slides = vec![
        SlideSpec::new("Revenue")
            .with_content(["Q1: 12M"])
            .with_asset(AssetRequest::new(
                AssetKind::Chart,
                Parameters::new().with("type", "bar"),
                dir.path().join("file.txt").join("chart.png"),
            )),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    let slide = &deck.report.slides[0];
    assert!(matches!(
        &slide.assets[0].outcome,
        ResolutionOutcome::Unresolved {
            reason: UnresolvedReason::PersistenceFailed(_)
        }
    ));
    assert_eq!(charts.calls(), 1);
    assert_eq!(slide.variant, LayoutVariant::TextOnly);
    assert_eq!(deck.report.unresolved_assets(), 1);
    assert!(deck.output.exists());
    assert_eq!(deck.slide_count(), 1);
    Ok(())
}
