//! Roomcast CLI - Render a predicted indoor layout

mod render;

use anyhow::Result;
use clap::Parser;
use roomcast_core::Color;
use roomcast_layout::RoomType;

#[derive(Parser)]
#[command(name = "roomcast")]
#[command(about = "Render a predicted room layout to a window or a turntable GIF", long_about = None)]
#[command(version)]
struct Cli {
    /// Results bundle written by the layout sampler
    result_file: String,

    /// Which predicted layout to render
    #[arg(long, default_value = "0")]
    index: String,

    /// Furniture catalog path; `{}` is replaced by the room type
    #[arg(long)]
    model_path: Option<String>,

    /// Where GIFs, snapshots, and exported meshes go
    #[arg(long)]
    output_directory: Option<String>,

    /// Render a 360-frame GIF instead of opening a window
    #[arg(long)]
    without_screen: bool,

    /// Solid floor colour (comma-separated r,g,b[,a])
    #[arg(long, value_parser = parse_color)]
    floor_color: Option<Color>,

    /// Directory of floor texture images, or a single image
    #[arg(long)]
    floor_textures: Option<String>,

    /// Colour furniture by category instead of texturing it
    #[arg(long)]
    without_texture: bool,

    #[arg(long)]
    without_floor: bool,

    /// Show the inner walls as translucent overlays
    #[arg(long)]
    with_walls: bool,

    /// Show doors and windows as translucent overlays
    #[arg(long)]
    with_doors_and_windows: bool,

    /// Also write the ground-truth scene as OBJ meshes
    #[arg(long)]
    export_mesh: bool,

    /// Skip room type detection
    #[arg(long, value_parser = parse_room_type)]
    room_type: Option<RoomType>,

    /// Seed for the floor texture pick
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_color(s: &str) -> Result<Color, String> {
    let values = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("invalid component '{}': {}", p, e)))
        .collect::<Result<Vec<f32>, String>>()?;
    Color::from_slice(&values)
        .ok_or_else(|| format!("expected 3 or 4 comma-separated values, got {}", values.len()))
}

fn parse_room_type(s: &str) -> Result<RoomType, String> {
    s.parse().map_err(|e: roomcast_core::RoomcastError| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    render::run(render::RenderArgs {
        result_file: cli.result_file,
        index: cli.index,
        model_path: cli.model_path,
        output_directory: cli.output_directory,
        without_screen: cli.without_screen,
        floor_color: cli.floor_color,
        floor_textures: cli.floor_textures,
        without_texture: cli.without_texture,
        without_floor: cli.without_floor,
        with_walls: cli.with_walls,
        with_doors_and_windows: cli.with_doors_and_windows,
        export_mesh: cli.export_mesh,
        room_type: cli.room_type,
        seed: cli.seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0.2,0.3,0.4").unwrap(), Color::rgb(0.2, 0.3, 0.4));
        assert_eq!(parse_color("1, 0, 0, 0.5").unwrap(), Color::new(1.0, 0.0, 0.0, 0.5));
        assert!(parse_color("1,0").is_err());
        assert!(parse_color("red,0,0").is_err());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "roomcast",
            "results.json",
            "--index",
            "2",
            "--without-screen",
            "--without-texture",
            "--room-type",
            "bedroom",
            "--seed",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.index, "2");
        assert!(cli.without_screen && cli.without_texture);
        assert!(!cli.without_floor);
        assert_eq!(cli.room_type, Some(RoomType::Bedroom));
        assert_eq!(cli.seed, Some(3));
    }

    #[test]
    fn test_unknown_room_type_rejected() {
        assert!(Cli::try_parse_from(["roomcast", "r.json", "--room-type", "kitchen"]).is_err());
    }
}
