use deckforge_types::{AssetKind, AssetRequest, LayoutVariant, ResolutionMap, SlideSpec};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An asset that made it through resolution, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAsset {
    pub kind: AssetKind,
    pub path: PathBuf,
}

/// Resolved assets of `spec`, in declaration order. Requests with no entry in
/// `resolutions` count as unresolved.
pub fn resolved_assets(spec: &SlideSpec, resolutions: &ResolutionMap) -> Vec<ResolvedAsset> {
    spec.asset_requests
        .iter()
        .filter_map(|request: &AssetRequest| {
            let resolution = resolutions.get(&request.fingerprint())?;
            resolution.path().map(|path| ResolvedAsset {
                kind: request.kind,
                path: path.to_path_buf(),
            })
        })
        .collect()
}

/// Picks the arrangement for a slide from its text and its resolved assets.
pub fn select_variant(spec: &SlideSpec, assets: &[ResolvedAsset]) -> LayoutVariant {
    let mut per_kind: BTreeMap<AssetKind, usize> = BTreeMap::new();
    for asset in assets {
        *per_kind.entry(asset.kind).or_default() += 1;
    }

    if per_kind.values().any(|&count| count >= 2) {
        LayoutVariant::Grid
    } else if assets.is_empty() {
        LayoutVariant::TextOnly
    } else if spec.content_blocks.is_empty() {
        LayoutVariant::AssetOnly
    } else {
        LayoutVariant::TextWithAsset
    }
}
