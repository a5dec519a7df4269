use starmap::models::{load_catalog, sample_catalog, Point3};
use starmap::spatial::{SystemGrid, DEFAULT_CELL_SIZE};

fn main() {
    let systems = match std::env::args().nth(1) {
        Some(path) => match load_catalog(&path) {
            Ok(systems) => systems,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        None => sample_catalog(1, 10_000, 1000.0),
    };
    let cell_size = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CELL_SIZE);

    let grid = SystemGrid::build(&systems, cell_size);
    let (cells, indexed, max_per_cell) = grid.stats();

    println!("Grid stats:");
    println!("  Systems: {} ({} indexed)", systems.len(), indexed);
    println!("  Cell size: {}", grid.cell_size());
    println!("  Non-empty cells: {}", cells);
    println!("  Max per cell: {}", max_per_cell);
    if cells > 0 {
        println!("  Avg per cell: {:.2}", indexed as f32 / cells as f32);
    }

    // how loose is the cube query compared to the exact sphere?
    for radius in [10.0, 25.0, 50.0, 100.0] {
        let mut near = 0usize;
        let mut within = 0usize;
        for system in systems.iter().step_by(100) {
            near += grid.query_near(system.position, radius).len();
            within += grid.query_within(&systems, system.position, radius).len();
        }
        println!(
            "  r={:>5.1}: {} candidates, {} within ({:.1}% kept)",
            radius,
            near,
            within,
            within as f32 * 100.0 / near.max(1) as f32
        );
    }

    let origin = grid.query_near(Point3::ZERO, 0.0);
    println!("  Systems in origin cell: {}", origin.len());
}
