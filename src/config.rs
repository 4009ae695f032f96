use crate::features::scholie::ScholieMatch;
use crate::features::Feature;
use crate::learning::LearnParams;
use crate::DynResult;
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

macro_rules! config_structs {
    {
        $(
            $( #[doc = $doc:literal] )*
            $( #[config_opt($attr:meta)] )*
            pub $name:ident: $typ:ty,
        )*
        $(
            #[config_alias($atarget:ident = $avalue:expr)]
            $( #[config_opt($aattr:meta)] )*
            pub $aname:ident: bool,
        )*
    } => {
        #[derive(Clone, Debug)]
        pub struct Config {
            $( $( #[doc = $doc] )* pub $name: $typ, )*
        }

        #[derive(Args, Debug, Default, Deserialize)]
        pub struct ConfigOpt {
            $( $( #[$aattr] )* #[serde(skip)] pub $aname: bool, )*
            $( $( #[doc = $doc] )* $( #[$attr] )* pub $name: Option<$typ>, )*
        }

        impl Config {
            pub fn update(self, mut opt: ConfigOpt) -> Config {
                $(
                    if opt.$aname {
                        opt.$atarget = Some($avalue);
                    }
                )*
                Config {
                    $( $name: opt.$name.unwrap_or(self.$name), )*
                }
            }
        }
    }
}

config_structs! {
    /// Word tables, tab-separated.
    #[config_opt(arg(short, long, value_name = "PATH", num_args = 1..))]
    pub words: Vec<PathBuf>,

    /// Reference alignments, one annotated unit per line.
    #[config_opt(arg(short, long, value_name = "PATH"))]
    pub gold: PathBuf,

    #[config_opt(arg(long, value_name = "PATH"))]
    pub vocabulary: PathBuf,

    #[config_opt(arg(long, value_name = "PATH"))]
    pub equivalent_terms: PathBuf,

    /// Commentary index, JSON.
    #[config_opt(arg(long, value_name = "PATH"))]
    pub scholie: PathBuf,

    /// Fraction of the problems used for training.
    #[config_opt(arg(long, value_name = "FRACTION"))]
    pub split: f64,

    #[config_opt(arg(short, long, value_name = "NUM"))]
    pub epochs: usize,

    #[config_opt(arg(long, value_name = "NUM"))]
    pub burn_in: usize,

    #[config_opt(arg(long, value_name = "RATE"))]
    pub initial_rate: f64,

    #[config_opt(arg(long, value_name = "FACTOR"))]
    pub decay: f64,

    /// Largest word group on either side of a substitution.
    #[config_opt(arg(short = 'k', long, value_name = "NUM"))]
    pub max_group: usize,

    #[config_opt(arg(short, long, value_enum, value_delimiter = ','))]
    pub features: Vec<Feature>,

    /// Use these weights instead of training.
    #[config_opt(arg(long, value_delimiter = ',', allow_negative_numbers = true, value_name = "W1,W2,..."))]
    pub weights: Vec<f64>,

    #[config_opt(arg(long, value_name = "NUM"))]
    pub seed: u64,

    #[config_opt(arg(long, group = "scholie_match_group"))]
    pub scholie_match: ScholieMatch,

    #[config_opt(arg(long, value_name = "SCORE"))]
    pub scholie_unpaired_score: f64,

    #[config_opt(arg(long, value_name = "SCORE"))]
    pub scholie_missing_score: f64,

    #[config_opt(arg(long, value_name = "TAG"))]
    pub source_tag: String,

    #[config_opt(arg(long, value_name = "TAG"))]
    pub target_tag: String,

    /// Append a line per run to this tab-separated file.
    #[config_opt(arg(long, value_name = "PATH"))]
    pub log_file: PathBuf,

    /// Write the predicted alignments to this JSON file.
    #[config_opt(arg(long, value_name = "PATH"))]
    pub output_json: PathBuf,

    #[config_alias(scholie_match = ScholieMatch::Exact)]
    #[config_opt(arg(long, group = "scholie_match_group"))]
    pub exact_scholie: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            words: vec![],
            gold: PathBuf::new(),
            vocabulary: PathBuf::new(),
            equivalent_terms: PathBuf::new(),
            scholie: PathBuf::new(),
            split: 0.3,
            epochs: 50,
            burn_in: 10,
            initial_rate: 1.0,
            decay: 0.8,
            max_group: 5,
            features: Feature::DEFAULT.to_vec(),
            weights: vec![],
            seed: 42,
            scholie_match: ScholieMatch::Prefix,
            scholie_unpaired_score: 1.0,
            scholie_missing_score: 1.0,
            source_tag: "HOM".to_owned(),
            target_tag: "PARA".to_owned(),
            log_file: PathBuf::new(),
            output_json: PathBuf::new(),
        }
    }
}

impl Config {
    pub fn learn_params(&self) -> LearnParams {
        LearnParams {
            epochs: self.epochs,
            burn_in: self.burn_in,
            initial_rate: self.initial_rate,
            decay: self.decay,
            seed: self.seed,
        }
    }

    /// Defaults, then the config file, then `cli`. Without `explicit_path` the file is
    /// `<config dir>/paralign/config.toml`, skipped when it doesn't exist.
    pub fn load(explicit_path: Option<&Path>, cli: ConfigOpt) -> DynResult<Config> {
        let mut config = Config::default();
        let path = match explicit_path {
            Some(path) => Some(path.to_owned()),
            None => default_config_path().filter(|path| path.exists()),
        };
        if let Some(path) = path {
            debug!(path = %path.display(), "reading config file");
            let text = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read config file {}: {e}", path.display()))?;
            config = config.update(parse_config_opt(&text).map_err(|e| format!("{}: {e}", path.display()))?);
        }
        Ok(config.update(cli))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("paralign").join("config.toml"))
}

pub fn parse_config_opt(text: &str) -> DynResult<ConfigOpt> {
    Ok(toml::from_str(text)?)
}
