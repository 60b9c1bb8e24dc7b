use mazetrace::{
    MazeError,
    config::Config,
    generators::generate_square,
    maze::CellState,
    results::{AlgorithmResult, FileResultStore, ResultStore, summarize},
    solvers::{Solver, timed_solve},
};

const USAGE: &str = "usage: bench [SIZE] [SEED]";

/// Read `[SIZE] [SEED]`. A missing size takes `default_size`, a missing seed
/// means OS entropy; anything present must parse.
fn parse_args(
    mut args: impl Iterator<Item = String>,
    default_size: usize,
) -> mazetrace::Result<(usize, Option<u64>)> {
    let size = match args.next() {
        Some(arg) => arg.parse::<usize>().map_err(|_| {
            MazeError::InvalidArgument(format!("SIZE {:?} is not a whole number ({})", arg, USAGE))
        })?,
        None => default_size,
    };
    let seed = match args.next() {
        Some(arg) => Some(arg.parse::<u64>().map_err(|_| {
            MazeError::InvalidArgument(format!("SEED {:?} is not a whole number ({})", arg, USAGE))
        })?),
        None => None,
    };
    if let Some(extra) = args.next() {
        return Err(MazeError::InvalidArgument(format!(
            "unexpected argument {:?} ({})",
            extra, USAGE
        )));
    }
    Ok((size, seed))
}

/// Usage: bench [SIZE] [SEED]
///
/// Generates one maze, runs every solver on it and records the
/// `name,executionTimeNanoseconds,pathLength` rows in the results file.
fn main() -> mazetrace::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    let (config, warnings) = Config::from_env();
    for warning in warnings {
        tracing::warn!("{}", warning);
    }

    let (size, seed) = parse_args(std::env::args().skip(1), config.default_size)?;

    let grid = generate_square(size, seed)?;
    let (Some(start), Some(end)) = (grid.find(CellState::Start), grid.find(CellState::End))
    else {
        return Err(MazeError::MissingEndpoints);
    };
    tracing::info!("Benchmarking {}x{} maze (seed {:?})", size, size, seed);

    let mut store = FileResultStore::open(&config.results_path)?;
    for solver in Solver::ALL {
        let (result, elapsed) = timed_solve(&grid, start, end, solver);
        let record = AlgorithmResult::new(solver.name(), elapsed, result.path_length());
        println!("{}", record.to_csv_row());
        tracing::info!(
            "{}: explored {} cells, path length {}",
            solver,
            result.explored_cells().len(),
            result.path_length()
        );
        if result.is_solution_found() {
            store.save_or_update(record)?;
        }
    }

    eprintln!("{}", summarize(&store.find_all()?));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(args(&[]), 21).unwrap(), (21, None));
        assert_eq!(parse_args(args(&["51"]), 21).unwrap(), (51, None));
        assert_eq!(parse_args(args(&["51", "7"]), 21).unwrap(), (51, Some(7)));
    }

    #[test]
    fn test_parse_args_rejects_garbage() {
        let cases: [&[&str]; 4] = [&["big"], &["51", "seven"], &["-3"], &["51", "7", "extra"]];
        for bad in cases {
            assert!(
                matches!(parse_args(args(bad), 21), Err(MazeError::InvalidArgument(_))),
                "{bad:?}"
            );
        }
    }
}
