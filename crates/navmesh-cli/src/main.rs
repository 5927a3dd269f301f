//! CLI utility for building navigation meshes and running path queries

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::fs::File;
use std::path::PathBuf;

use navmesh::{GroupedNavMesh, Navigation, NavigationConfig, RectangularMaze};
use navmesh_common::TriMesh;

/// Build navigation meshes from triangle geometry and find paths on them
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a grouped navigation mesh from an input mesh
    Build {
        /// Input mesh file (OBJ format)
        #[clap(long, value_parser)]
        input: PathBuf,

        /// Output navigation mesh file (JSON)
        #[clap(long, value_parser)]
        output: PathBuf,

        /// Decimal digits used when merging duplicate vertices
        #[clap(long, default_value = "4")]
        precision: u32,

        /// Centroid-distance prune radius for adjacency detection
        #[clap(long, default_value = "100.0")]
        neighbour_radius: f32,
    },

    /// Find a path between two points on a built navigation mesh
    FindPath {
        /// Navigation mesh file produced by `build`
        #[clap(long, value_parser)]
        navmesh: PathBuf,

        /// Start position as x,y,z
        #[clap(long, value_parser = parse_vec3)]
        start: Vec3,

        /// Target position as x,y,z
        #[clap(long, value_parser = parse_vec3)]
        target: Vec3,
    },

    /// Generate a rectangular maze, solve it, and print the rendering
    Maze {
        #[clap(long, default_value = "10")]
        rows: usize,

        #[clap(long, default_value = "10")]
        cols: usize,

        /// Generator seed; the same seed carves the same maze
        #[clap(long, default_value = "1")]
        seed: u32,
    },
}

fn parse_vec3(value: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{value}'"));
    }
    let mut coords = [0.0f32; 3];
    for (slot, part) in coords.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("'{part}' is not a number"))?;
    }
    Ok(Vec3::from_array(coords))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Build {
            input,
            output,
            precision,
            neighbour_radius,
        } => build(input, output, precision, neighbour_radius),
        Commands::FindPath {
            navmesh,
            start,
            target,
        } => find_path(navmesh, start, target),
        Commands::Maze { rows, cols, seed } => maze(rows, cols, seed),
    }
}

fn build(input: PathBuf, output: PathBuf, precision: u32, neighbour_radius: f32) -> Result<()> {
    let mesh = TriMesh::from_obj(&input)
        .with_context(|| format!("failed to load mesh from {}", input.display()))?;
    println!(
        "loaded {} vertices, {} triangles",
        mesh.vert_count(),
        mesh.tri_count()
    );

    let nav = Navigation::with_config(NavigationConfig {
        merge_precision_decimals: precision,
        neighbour_search_radius: neighbour_radius,
    });
    let zone = nav.build_nodes(&mesh);
    println!(
        "built {} polygons in {} groups",
        zone.polygon_count(),
        zone.groups.len()
    );

    let file = File::create(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    serde_json::to_writer(file, &zone).context("failed to write navigation mesh")?;
    println!("wrote {}", output.display());

    Ok(())
}

fn find_path(navmesh: PathBuf, start: Vec3, target: Vec3) -> Result<()> {
    let file = File::open(&navmesh)
        .with_context(|| format!("failed to open {}", navmesh.display()))?;
    let zone: GroupedNavMesh =
        serde_json::from_reader(file).context("failed to parse navigation mesh")?;

    let mut nav = Navigation::new();
    nav.set_zone_data("default", zone);

    let group = nav
        .get_group("default", start)
        .ok_or_else(|| anyhow!("navigation mesh contains no polygons"))?;
    println!("start is in group {group}");

    let waypoints = nav.find_path(start, target, "default", group);
    if waypoints.is_empty() {
        println!("no path found");
        return Ok(());
    }

    println!("path with {} waypoints:", waypoints.len());
    for point in waypoints {
        println!("  {:.2}, {:.2}, {:.2}", point.x, point.y, point.z);
    }

    Ok(())
}

fn maze(rows: usize, cols: usize, seed: u32) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(anyhow!("maze needs at least one row and one column"));
    }

    let mut maze = RectangularMaze::new(rows, cols);
    maze.generate_maze(seed);
    let path = maze.solve();

    print!("{maze}");
    println!("solved in {} steps", path.len().saturating_sub(1));

    Ok(())
}
