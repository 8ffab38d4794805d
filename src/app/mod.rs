pub mod pipelines;

use crate::config::toml_config::ConvertConfig;
use crate::config::Mode;
use crate::core::etl::EtlEngine;
use crate::core::{ConfigProvider, Storage};
use crate::utils::error::Result;
use pipelines::{RosterKind, RosterPipeline, SizesPipeline, SummaryPipeline, VoaPipeline};
use rand::Rng;

/// Build the pipeline for `mode` and run it to completion. Returns the
/// output path.
pub fn run_mode<S, C, R>(
    mode: Mode,
    storage: S,
    config: C,
    settings: ConvertConfig,
    rng: R,
) -> Result<String>
where
    S: Storage,
    C: ConfigProvider,
    R: Rng,
{
    tracing::info!("🚀 Running '{}' conversion on {}", mode, config.input_path());

    match mode {
        Mode::Cores => EtlEngine::new(RosterPipeline::new(
            storage,
            config,
            settings,
            RosterKind::Cores,
            rng,
        ))
        .run(),
        Mode::Exes => EtlEngine::new(RosterPipeline::new(
            storage,
            config,
            settings,
            RosterKind::Exes,
            rng,
        ))
        .run(),
        Mode::Sizes => EtlEngine::new(SizesPipeline::new(storage, config, settings)).run(),
        Mode::Voa => EtlEngine::new(VoaPipeline::new(storage, config, settings)?).run(),
        Mode::Summary => EtlEngine::new(SummaryPipeline::new(storage, config)).run(),
    }
}
