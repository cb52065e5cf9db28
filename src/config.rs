use crate::board::{is_valid_pair, State};
use crate::moves::MoveSet;
use crate::solver::{
    Algorithm, AnnealingParams, BeamParams, IdaStarParams, IddfsParams, QLearningParams,
    RestartParams,
};

use anyhow::anyhow;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "puzzle_search",
    about = "Sliding-tile puzzle search algorithms implemented in Rust.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to the YAML config file")]
    pub config: Option<String>,

    #[arg(long, value_enum, help = "Search algorithm to use")]
    pub algorithm: Option<Algorithm>,

    #[arg(long, value_enum, help = "Single moves only, or single and double moves")]
    pub moves: Option<MoveSet>,

    #[arg(long, value_delimiter = ',', help = "Start board, comma separated, blank = n*n")]
    pub start: Vec<u8>,

    #[arg(long, value_delimiter = ',', help = "Goal board, comma separated")]
    pub goal: Vec<u8>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Path to a YAML scenario of instances to solve in batch")]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Path to write JSON results to")]
    pub output_path: Option<String>,

    #[arg(long, help = "Generate a scenario with this many instances instead of solving")]
    pub generate: Option<usize>,

    #[arg(
        long,
        help = "Random moves applied to the goal when generating",
        default_value_t = 20
    )]
    pub scramble_depth: usize,

    #[arg(long, help = "Enable debug logging", default_value_t = false)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub algorithm: Algorithm,
    pub moves: MoveSet,
    pub start: State,
    pub goal: State,
    pub seed: u64,
    pub scenario_path: Option<String>,
    pub output_path: Option<String>,

    // Per-algorithm tunables; a missing block takes the defaults for the
    // configured move set.
    pub iddfs: Option<IddfsParams>,
    pub ida_star: Option<IdaStarParams>,
    pub hill_climbing: Option<RestartParams>,
    pub steepest_hill: Option<RestartParams>,
    pub stochastic_hill: Option<RestartParams>,
    pub simulated_annealing: Option<AnnealingParams>,
    pub beam_search: Option<BeamParams>,
    pub q_learning: Option<QLearningParams>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            algorithm: Algorithm::AStar,
            moves: MoveSet::Single,
            start: State::from([1, 8, 2, 9, 4, 3, 7, 6, 5]),
            goal: State::from([1, 2, 3, 4, 5, 6, 7, 8, 9]),
            seed: 0,
            scenario_path: None,
            output_path: None,
            iddfs: None,
            ida_star: None,
            hill_climbing: None,
            steepest_hill: None,
            stochastic_hill: None,
            simulated_annealing: None,
            beam_search: None,
            q_learning: None,
        }
    }
}

impl Config {
    /// Parses only. The file may leave half of a board pair to the command
    /// line, so validation waits for `override_from_command_line`.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(moves) = cli.moves {
            self.moves = moves;
        }
        if !cli.start.is_empty() {
            self.start = State::new(cli.start.clone());
        }
        if !cli.goal.is_empty() {
            self.goal = State::new(cli.goal.clone());
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if cli.scenario_path.is_some() {
            self.scenario_path = cli.scenario_path.clone();
        }
        if cli.output_path.is_some() {
            self.output_path = cli.output_path.clone();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !is_valid_pair(&self.start, &self.goal) {
            return Err(anyhow!(
                "start {:?} and goal {:?} must be permutations of 1..=n*n of the same square size",
                self.start.tiles(),
                self.goal.tiles()
            ));
        }

        let ida_star = self.ida_star_params();
        if ida_star.max_iterations == 0 {
            return Err(anyhow!("IDA* max_iterations must be positive"));
        }

        for (name, restart) in [
            ("hill_climbing", self.hill_climbing_params()),
            ("steepest_hill", self.steepest_hill_params()),
            ("stochastic_hill", self.stochastic_hill_params()),
        ] {
            if !(0.0..=1.0).contains(&restart.restart_from_best) {
                return Err(anyhow!(
                    "{name} restart_from_best must be a probability, got {}",
                    restart.restart_from_best
                ));
            }
            if restart.stuck_limit == 0 {
                return Err(anyhow!("{name} stuck_limit must be positive"));
            }
        }

        let annealing = self.simulated_annealing_params();
        if !(annealing.cooling_rate > 0.0 && annealing.cooling_rate < 1.0) {
            return Err(anyhow!(
                "cooling_rate must lie in (0, 1), got {}",
                annealing.cooling_rate
            ));
        }
        if annealing.min_temperature <= 0.0 || annealing.initial_temperature <= 0.0 {
            return Err(anyhow!("annealing temperatures must be positive"));
        }

        if self.beam_search_params().beam_width == 0 {
            return Err(anyhow!("beam_width must be positive"));
        }

        let q_learning = self.q_learning_params();
        for (name, value) in [
            ("alpha", q_learning.alpha),
            ("gamma", q_learning.gamma),
            ("epsilon", q_learning.epsilon),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("Q-learning {name} must lie in [0, 1], got {value}"));
            }
        }

        Ok(())
    }

    pub fn iddfs_params(&self) -> IddfsParams {
        self.iddfs
            .clone()
            .unwrap_or_else(|| IddfsParams::default_for(self.moves))
    }

    pub fn ida_star_params(&self) -> IdaStarParams {
        self.ida_star.clone().unwrap_or_default()
    }

    pub fn hill_climbing_params(&self) -> RestartParams {
        self.hill_climbing
            .clone()
            .unwrap_or_else(RestartParams::hill_climbing)
    }

    pub fn steepest_hill_params(&self) -> RestartParams {
        self.steepest_hill
            .clone()
            .unwrap_or_else(RestartParams::steepest_hill)
    }

    pub fn stochastic_hill_params(&self) -> RestartParams {
        self.stochastic_hill
            .clone()
            .unwrap_or_else(RestartParams::stochastic_hill)
    }

    pub fn simulated_annealing_params(&self) -> AnnealingParams {
        self.simulated_annealing
            .clone()
            .unwrap_or_else(|| AnnealingParams::default_for(self.moves))
    }

    pub fn beam_search_params(&self) -> BeamParams {
        self.beam_search
            .clone()
            .unwrap_or_else(|| BeamParams::default_for(self.moves))
    }

    pub fn q_learning_params(&self) -> QLearningParams {
        self.q_learning.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.algorithm, Algorithm::AStar);
        assert_eq!(config.iddfs_params().max_depth, 20);
        assert_eq!(config.beam_search_params().beam_width, 5);
        assert_eq!(config.stochastic_hill_params().stuck_limit, 10);

        let double = Config {
            moves: MoveSet::Double,
            ..Config::default()
        };
        assert_eq!(double.iddfs_params().max_depth, 30);
        assert_eq!(double.beam_search_params().beam_width, 10);
        assert_eq!(double.simulated_annealing_params().min_temperature, 0.1);
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
algorithm: beam_search
moves: double
start: [1, 2, 3, 4, 5, 6, 9, 7, 8]
seed: 42
beam_search:
  beam_width: 3
  max_depth: 40
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.algorithm, Algorithm::BeamSearch);
        assert_eq!(config.moves, MoveSet::Double);
        assert_eq!(config.goal, State::solved(3).unwrap());
        assert_eq!(config.seed, 42);
        assert_eq!(
            config.beam_search_params(),
            BeamParams {
                beam_width: 3,
                max_depth: 40
            }
        );
        // Untouched blocks keep the double-move defaults.
        assert_eq!(config.iddfs_params().max_depth, 30);
    }

    fn no_overrides() -> Cli {
        Cli::parse_from(["puzzle_search"])
    }

    fn load(yaml: &str) -> anyhow::Result<Config> {
        Config::from_yaml_str(yaml)?.override_from_command_line(&no_overrides())
    }

    #[test]
    fn test_validation() {
        assert!(load("start: [1, 2, 3]").is_err());
        assert!(load("goal: [1, 2, 3, 4]").is_err());
        assert!(Config::from_yaml_str("algorithm: bogo_sort").is_err());

        let yaml = "simulated_annealing:\n  initial_temperature: 100.0\n  cooling_rate: 1.5\n  min_temperature: 0.1\n  max_iterations: 10\n";
        assert!(load(yaml).is_err());

        let yaml = "q_learning:\n  alpha: 0.1\n  gamma: 2.0\n  epsilon: 0.1\n  episodes: 1\n  max_steps: 1\n  max_path_len: 1\n";
        assert!(load(yaml).is_err());
    }

    #[test]
    fn test_yaml_goal_with_command_line_start() {
        // Neither half is valid against the 3x3 default on its own.
        let config = Config::from_yaml_str("goal: [1, 2, 3, 4]\n").unwrap();
        let cli = Cli::parse_from(["puzzle_search", "--start", "1,2,4,3"]);
        let merged = config.override_from_command_line(&cli).unwrap();
        assert_eq!(merged.start, State::from([1, 2, 4, 3]));
        assert_eq!(merged.goal, State::from([1, 2, 3, 4]));
    }

    #[test]
    fn test_override_from_command_line() {
        let cli = Cli::parse_from([
            "puzzle_search",
            "--algorithm",
            "ida_star",
            "--moves",
            "double",
            "--start",
            "1,2,3,4,5,6,7,9,8",
            "--seed",
            "7",
        ]);
        let config = Config::default().override_from_command_line(&cli).unwrap();
        assert_eq!(config.algorithm, Algorithm::IdaStar);
        assert_eq!(config.moves, MoveSet::Double);
        assert_eq!(config.start, State::from([1, 2, 3, 4, 5, 6, 7, 9, 8]));
        assert_eq!(config.seed, 7);

        let cli = Cli::parse_from(["puzzle_search", "--goal", "1,2,3,4"]);
        assert!(Config::default().override_from_command_line(&cli).is_err());
    }
}
