mod common;

use common::fixtures::*;
use common::{TestResult, generate_deck};
use deckforge::core::TransitionStatus;
use deckforge::core::transition::{NS_MARKUP_COMPAT, NS_P14, NS_P159, NS_PRESENTATION};
use deckforge::traits::DocumentError;
use deckforge::types::{
    AssetKind, AssetRequest, LayoutVariant, NotesMap, Parameters, ProviderId, SlideSpec,
    TransitionPolicy,
};
use deckforge::{PipelineBuilder, PipelineConfig, PipelineError};
use std::io::Write;
use std::time::Duration;

fn chart_pipeline() -> Result<deckforge::DeckPipeline, PipelineError> {
    PipelineBuilder::new()
        .with_shared_provider("charts", CountingProvider::new())
        .with_chain(AssetKind::Chart, ["charts"])
        .build()
}

#[tokio::test]
async fn test_revenue_slide_with_fade() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let slides = vec![
        revenue_slide(dir.path()).with_transition(TransitionPolicy::Fade { duration_ms: 600 }),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    let slide = &deck.report.slides[0];
    assert_eq!(slide.variant, LayoutVariant::TextWithAsset);
    assert_eq!(slide.identifier, "01-revenue");
    assert_eq!(slide.transition, TransitionStatus::Applied);
    assert!(deck.path("assets/revenue.png").exists());

    let doc = deck.document();
    let transition = doc
        .descendants()
        .find(|n| n.has_tag_name((NS_PRESENTATION, "transition")))
        .expect("fade transition in saved deck");
    assert_eq!(transition.attribute("spd"), Some("med"));
    assert_eq!(transition.attribute((NS_P14, "dur")), Some("600"));
    assert!(
        transition
            .children()
            .any(|n| n.has_tag_name((NS_PRESENTATION, "fade")))
    );

    assert_eq!(deck.slide_titles(), vec!["Revenue".to_string()]);
    assert!(doc.descendants().any(|n| n.tag_name().name() == "pic"));
    Ok(())
}

#[tokio::test]
async fn test_morph_emits_alternate_content_with_fallback() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let slides = vec![
        SlideSpec::new("Roadmap")
            .with_content(["H1", "H2"])
            .with_transition(TransitionPolicy::Morph { duration_ms: 1500 }),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;
    assert_eq!(deck.report.slides[0].transition, TransitionStatus::Applied);

    let doc = deck.document();
    let alternate = doc
        .descendants()
        .find(|n| n.has_tag_name((NS_MARKUP_COMPAT, "AlternateContent")))
        .expect("morph wrapped in AlternateContent");

    let choice = alternate
        .children()
        .find(|n| n.has_tag_name((NS_MARKUP_COMPAT, "Choice")))
        .expect("choice branch");
    assert_eq!(choice.attribute("Requires"), Some("p159"));
    let morph = choice
        .descendants()
        .find(|n| n.has_tag_name((NS_P159, "morph")))
        .expect("morph element");
    assert_eq!(morph.attribute("option"), Some("byObject"));
    let choice_transition = morph.parent().expect("transition around morph");
    assert_eq!(choice_transition.attribute((NS_P14, "dur")), Some("1500"));

    let fallback = alternate
        .children()
        .find(|n| n.has_tag_name((NS_MARKUP_COMPAT, "Fallback")))
        .expect("fallback branch");
    assert!(
        fallback
            .descendants()
            .any(|n| n.has_tag_name((NS_PRESENTATION, "fade")))
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_custom_transition_only_skips_that_slide() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let slides = vec![
        SlideSpec::new("Broken").with_transition(TransitionPolicy::Custom {
            markup: "<p:transition><p:fade></p:transition>".to_string(),
        }),
        SlideSpec::new("Fine").with_transition(TransitionPolicy::Fade { duration_ms: 300 }),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    assert!(matches!(
        deck.report.slides[0].transition,
        TransitionStatus::Skipped(_)
    ));
    assert_eq!(deck.report.slides[1].transition, TransitionStatus::Applied);
    assert_eq!(deck.report.skipped_transitions(), 1);
    assert_eq!(deck.slide_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_custom_transition_with_xml_declaration_keeps_deck_well_formed() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let markup = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><p:transition xmlns:p="{}"><p:push/></p:transition>"#,
        NS_PRESENTATION
    );
    let slides = vec![
        SlideSpec::new("Pushed").with_transition(TransitionPolicy::Custom { markup }),
        SlideSpec::new("Faded").with_transition(TransitionPolicy::Fade { duration_ms: 400 }),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    assert!(matches!(
        deck.report.slides[0].transition,
        TransitionStatus::Skipped(_)
    ));
    assert_eq!(deck.report.slides[1].transition, TransitionStatus::Applied);

    // document() panics if the saved deck is not well-formed
    let doc = deck.document();
    assert_eq!(deck.slide_count(), 2);
    assert!(!doc.descendants().any(|n| n.has_tag_name((NS_PRESENTATION, "push"))));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slide_order_survives_out_of_order_completion() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = PipelineBuilder::new()
        .with_shared_provider("charts", CountingProvider::new())
        .with_chain(AssetKind::Chart, ["charts"])
        .with_max_concurrency(4)
        .build()?;

    let slow_chart = AssetRequest::new(
        AssetKind::Chart,
        Parameters::new().with("delay_ms", "200"),
        dir.path().join("assets/slow.png"),
    );
    let mut slides = numbered_slides(8);
    slides[0] = slides[0].clone().with_asset(slow_chart);

    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    let expected: Vec<String> = (1..=8).map(|i| format!("Slide {}", i)).collect();
    assert_eq!(deck.slide_titles(), expected);
    let ordinals: Vec<usize> = deck.report.slides.iter().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, (1..=8).collect::<Vec<_>>());
    assert_eq!(deck.report.slides[0].variant, LayoutVariant::TextWithAsset);
    Ok(())
}

#[tokio::test]
async fn test_empty_deck_still_saves() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let deck = generate_deck(&pipeline, dir, vec![], &NotesMap::new()).await?;

    assert!(deck.report.slides.is_empty());
    assert_eq!(deck.slide_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_aborted_run_returns_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let handle = pipeline.abort_handle();
    handle.abort();

    let output = dir.path().join("deck.xml");
    let result = pipeline
        .generate_to_file(numbered_slides(3), &NotesMap::new(), &output)
        .await;

    assert!(matches!(result, Err(PipelineError::Aborted)));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_notes_coverage_through_pipeline() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let slides: Vec<SlideSpec> = (1..=5)
        .map(|i| SlideSpec::new(format!("Topic {}", i)).with_note_id(format!("s{}", i)))
        .collect();
    let notes: NotesMap = [
        ("s1", "Open with the headline number."),
        ("s3", "Pause for questions."),
        ("s6", "Orphaned note."),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let deck = generate_deck(&pipeline, dir, slides, &notes).await?;

    let coverage = &deck.report.notes;
    assert_eq!(coverage.unmatched_note_ids, vec!["s6".to_string()]);
    assert_eq!(
        coverage.slides_without_notes,
        vec!["s2".to_string(), "s4".to_string(), "s5".to_string()]
    );
    assert!(coverage.ambiguous_ids.is_empty());
    assert!(!coverage.is_complete());

    let attached: Vec<bool> = deck.report.slides.iter().map(|s| s.notes_attached).collect();
    assert_eq!(attached, vec![true, false, true, false, false]);

    let doc = deck.document();
    let note_texts: Vec<&str> = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "notes")
        .filter_map(|n| n.descendants().find(|t| t.tag_name().name() == "t")?.text())
        .collect();
    assert_eq!(
        note_texts,
        vec!["Open with the headline number.", "Pause for questions."]
    );
    Ok(())
}

#[tokio::test]
async fn test_save_failure_is_fatal() -> TestResult {
    let dir = tempfile::tempdir()?;
    let pipeline = chart_pipeline()?;
    let output = dir.path().join("missing-dir").join("deck.xml");

    let result = pipeline
        .generate_to_file(numbered_slides(2), &NotesMap::new(), &output)
        .await;

    assert!(matches!(
        result,
        Err(PipelineError::Document(DocumentError::Io(_)))
    ));
    Ok(())
}

#[tokio::test]
async fn test_builder_rejects_chain_with_unknown_provider() {
    let result = PipelineBuilder::new()
        .with_chain(AssetKind::StockPhoto, ["unsplash"])
        .build();
    assert!(matches!(result, Err(PipelineError::Config(msg)) if msg.contains("unsplash")));
}

#[tokio::test]
async fn test_filesystem_provider_from_config() -> TestResult {
    let source = tempfile::tempdir()?;
    std::fs::write(source.path().join("logo.png"), FAKE_PNG)?;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
provider_timeout_ms = 2000

[chains]
image = ["brand"]

[providers.brand]
type = "filesystem"
base_path = "{}"
kinds = ["image"]
"#,
        source.path().display()
    )?;
    let config = PipelineConfig::load(Some(file.path()))?;
    let pipeline = PipelineBuilder::from_config(&config)?
        .with_provider_timeout(Duration::from_secs(2))
        .build()?;

    let dir = tempfile::tempdir()?;
    let slides = vec![
        SlideSpec::new("Brand").with_asset(AssetRequest::new(
            AssetKind::Image,
            Parameters::new().with("path", "logo.png"),
            dir.path().join("assets/logo.png"),
        )),
        SlideSpec::new("Escape").with_asset(AssetRequest::new(
            AssetKind::Image,
            Parameters::new().with("path", "../outside.png"),
            dir.path().join("assets/outside.png"),
        )),
    ];
    let deck = generate_deck(&pipeline, dir, slides, &NotesMap::new()).await?;

    assert_eq!(deck.report.slides[0].variant, LayoutVariant::AssetOnly);
    assert_eq!(
        deck.report.slides[0].assets[0].provider,
        Some(ProviderId::new("brand"))
    );
    assert_eq!(std::fs::read(deck.path("assets/logo.png"))?, FAKE_PNG);

    assert_eq!(deck.report.slides[1].variant, LayoutVariant::TextOnly);
    assert_eq!(deck.report.unresolved_assets(), 1);
    Ok(())
}
