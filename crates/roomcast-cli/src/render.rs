//! Load, resolve, assemble, and output one predicted layout

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use roomcast_core::{Color, RoomcastConfig};
use roomcast_layout::{resolve_index, FurnitureCatalog, ResultsBundle, RoomType};
use roomcast_render::{ViewSettings, WgpuSink};
use roomcast_scene::{
    export_scene, resolve_color_policy, resolve_floor_policy, run_output, ModelCache, OutputMode,
    OutputPlan, OverlayFlags, PolicyInputs, SceneAssembler, DEFAULT_FRAME_DURATION_MS,
};
use std::path::{Path, PathBuf};

pub struct RenderArgs {
    pub result_file: String,
    pub index: String,
    pub model_path: Option<String>,
    pub output_directory: Option<String>,
    pub without_screen: bool,
    pub floor_color: Option<Color>,
    pub floor_textures: Option<String>,
    pub without_texture: bool,
    pub without_floor: bool,
    pub with_walls: bool,
    pub with_doors_and_windows: bool,
    pub export_mesh: bool,
    pub room_type: Option<RoomType>,
    pub seed: Option<u64>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let mut config = RoomcastConfig::load().context("Failed to load configuration")?;
    apply_flags(&mut config, &args);

    let bundle = ResultsBundle::load(&args.result_file)
        .with_context(|| format!("Failed to load results from {}", args.result_file))?;

    let room_type = match args.room_type {
        Some(room_type) => room_type,
        None => bundle.room_type().context("Failed to detect room type")?,
    };
    println!("[layout] Room type: {}", room_type);

    let output_directory = output_directory(&config, Path::new(&args.result_file));
    println!("[layout] Output directory: {}", output_directory.display());

    let model_path = config.model_path_for(room_type.as_str());
    let catalog = FurnitureCatalog::load(&model_path)
        .with_context(|| format!("Failed to load furniture catalog {}", model_path))?;
    println!("[catalog] Loaded {} models from {}", catalog.len(), model_path);

    let resolved = resolve_index(&args.index, bundle.len())?;
    let selection = bundle.select(resolved.index)?;
    println!(
        "[layout] Rendering layout {} (scene {}, {} objects)",
        resolved.index,
        selection.scene.scene_id,
        selection.layout.len()
    );

    let inputs = PolicyInputs {
        without_floor: args.without_floor,
        without_texture: args.without_texture,
        floor_color: args.floor_color,
        texture_directory: PathBuf::from(&config.floor_textures),
    }
    .apply_room_mask(bundle.room_mask_condition());
    if inputs.without_floor && !args.without_floor {
        println!("[layout] Layouts were sampled without a room mask; rendering without floor");
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let floor = resolve_floor_policy(&inputs, &mut rng).context("Failed to resolve floor")?;
    let colors = resolve_color_policy(&inputs, bundle.test_dataset.n_object_types());

    let mut models = ModelCache::new();
    let scene = SceneAssembler::new(&catalog, &bundle.test_dataset.object_types, &mut models)
        .assemble(
            selection.scene,
            selection.layout,
            &floor,
            &colors,
            OverlayFlags {
                walls: args.with_walls,
                doors_and_windows: args.with_doors_and_windows,
            },
        )
        .context("Failed to assemble scene")?;
    println!(
        "[catalog] Imported {} models and {} images",
        models.model_count(),
        models.image_count()
    );

    let plan = OutputPlan {
        mode: if args.without_screen {
            OutputMode::Batch
        } else {
            OutputMode::Interactive
        },
        output_directory: output_directory.clone(),
        requested_index: resolved.requested.clone(),
        flat_palette: colors.is_flat(),
        frame_duration_ms: config
            .gif
            .frame_duration_ms
            .unwrap_or(DEFAULT_FRAME_DURATION_MS),
    };
    let view = ViewSettings::sideview().with_overrides(&config.view);
    let mut sink = WgpuSink::new();
    run_output(&mut sink, &scene, &plan, &view).context("Failed to render scene")?;

    if args.export_mesh {
        export_scene(&output_directory, selection.scene, &floor, &mut models)
            .context("Failed to export meshes")?;
    }

    Ok(())
}

/// Flags sit above every configuration layer
fn apply_flags(config: &mut RoomcastConfig, args: &RenderArgs) {
    if let Some(model_path) = &args.model_path {
        config.model_path = model_path.clone();
    }
    if let Some(floor_textures) = &args.floor_textures {
        config.floor_textures = floor_textures.clone();
    }
    if let Some(output_directory) = &args.output_directory {
        config.output_directory = output_directory.clone();
    }
}

/// An empty output directory means next to the result file
fn output_directory(config: &RoomcastConfig, result_file: &Path) -> PathBuf {
    if config.output_directory.is_empty() {
        result_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    } else {
        PathBuf::from(&config.output_directory)
    }
}
