use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use splat_scene::{
    DecodeFailure, DecodeOptions, DecodeReport, VertexAttributeSet, decode_with_report,
};
use thiserror::Error;

/// Attributes ready to be framed and mounted.
#[derive(Debug, Clone)]
pub struct DecodedScene {
    pub attributes: VertexAttributeSet,
    pub report: DecodeReport,
}

/// The result of decoding one scene file.
///
/// Decode failures are kept inside the asset so the viewer can report their
/// kind. Only failures to read the bytes surface as loader errors.
#[derive(Asset, TypePath, Debug, Clone)]
pub struct SplatSceneAsset {
    pub outcome: Result<DecodedScene, DecodeFailure>,
}

impl SplatSceneAsset {
    pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Self {
        let outcome = decode_with_report(bytes, options)
            .map(|(attributes, report)| DecodedScene { attributes, report });
        Self { outcome }
    }
}

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error("could not read scene bytes: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes `.ply` scene files. Decode options arrive as per-load settings.
#[derive(Default)]
pub struct SplatSceneLoader;

impl AssetLoader for SplatSceneLoader {
    type Asset = SplatSceneAsset;
    type Settings = DecodeOptions;
    type Error = SceneLoadError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        settings: &DecodeOptions,
        load_context: &mut LoadContext<'_>,
    ) -> Result<SplatSceneAsset, SceneLoadError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        debug!(
            "Decoding {} ({} bytes)",
            load_context.path().display(),
            bytes.len()
        );
        Ok(SplatSceneAsset::decode(&bytes, settings))
    }

    fn extensions(&self) -> &[&str] {
        &["ply"]
    }
}
