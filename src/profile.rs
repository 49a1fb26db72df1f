//! Static per-machine configuration: exclusion margin, coin retention, recognized option
//! lists, locked attributes and the deployment policy knobs. Loaded once and immutable
//! thereafter.

use std::io;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::condition::{Condition, MalformedCondition};
use crate::criteria::{Attr, UNSPECIFIED};
use crate::file;

/// Coins consumed per unit of spin-cost normalization.
pub const COINS_PER_UNIT: f64 = 50.0;

/// Coins bet per game played.
pub const BET_PER_GAME: f64 = 3.0;

/// Currency value of one coin.
pub const YEN_PER_COIN: f64 = 20.0;

pub const DEFAULT_MIN_SAMPLE: usize = 100;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown machine \"{0}\"")]
pub struct UnknownMachine(pub String);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read catalog: {0}")]
    Io(#[from] io::Error),

    #[error("machine \"{machine}\": {source}")]
    Invalid {
        machine: String,
        source: MalformedCondition,
    },
}

/// Handling of a condition string that fails to parse.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConditionPolicy {
    /// Surface [MalformedCondition] to the caller.
    #[default]
    Strict,
    /// Degrade the offending predicate to match nothing.
    Lenient,
}

/// Whether the exclusion margin is added to the caller's spin count before the
/// eligibility cutoff is applied.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    #[default]
    WithMargin,
    Exact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineProfile {
    pub display_name: String,
    pub file_key: String,
    pub exclude_games: i64,
    pub coin_moti: f64,
    #[serde(default = "default_min_sample")]
    pub min_sample: usize,
    #[serde(default)]
    pub policy: ConditionPolicy,
    #[serde(default)]
    pub eligibility: Eligibility,
    #[serde(default = "default_coins_per_unit")]
    pub coins_per_unit: f64,
    #[serde(default = "default_bet_per_game")]
    pub bet_per_game: f64,
    #[serde(default = "default_yen_per_coin")]
    pub yen_per_coin: f64,
    #[serde(default)]
    pub options: FxHashMap<Attr, Vec<String>>,
    #[serde(default)]
    pub locked: Vec<Attr>,
}
impl MachineProfile {
    pub fn new(display_name: &str, file_key: &str, exclude_games: i64, coin_moti: f64) -> Self {
        Self {
            display_name: display_name.to_string(),
            file_key: file_key.to_string(),
            exclude_games,
            coin_moti,
            min_sample: DEFAULT_MIN_SAMPLE,
            policy: ConditionPolicy::default(),
            eligibility: Eligibility::default(),
            coins_per_unit: COINS_PER_UNIT,
            bet_per_game: BET_PER_GAME,
            yen_per_coin: YEN_PER_COIN,
            options: FxHashMap::default(),
            locked: vec![],
        }
    }

    pub fn with_options(mut self, attr: Attr, options: &[&str]) -> Self {
        self.options
            .insert(attr, options.iter().map(ToString::to_string).collect());
        self
    }

    pub fn with_locked(mut self, locked: &[Attr]) -> Self {
        self.locked = locked.to_vec();
        self
    }

    pub fn with_min_sample(mut self, min_sample: usize) -> Self {
        self.min_sample = min_sample;
        self
    }

    pub fn with_policy(mut self, policy: ConditionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn options(&self, attr: Attr) -> &[String] {
        self.options.get(&attr).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_locked(&self, attr: Attr) -> bool {
        self.locked.contains(&attr)
    }

    /// The amount added to the caller's spin count before the eligibility cutoff.
    pub fn margin(&self) -> i64 {
        match self.eligibility {
            Eligibility::WithMargin => self.exclude_games,
            Eligibility::Exact => 0,
        }
    }

    /// Every non-sentinel entry of every numeric option list must parse. `prev_type` is
    /// categorical and exempt.
    pub fn validate(&self) -> Result<(), MalformedCondition> {
        for attr in Attr::iter() {
            if attr == Attr::PrevType {
                continue;
            }
            for option in self.options(attr) {
                if option != UNSPECIFIED {
                    option.parse::<Condition>()?;
                }
            }
        }
        Ok(())
    }
}

fn default_min_sample() -> usize {
    DEFAULT_MIN_SAMPLE
}

fn default_coins_per_unit() -> f64 {
    COINS_PER_UNIT
}

fn default_bet_per_game() -> f64 {
    BET_PER_GAME
}

fn default_yen_per_coin() -> f64 {
    YEN_PER_COIN
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineCatalog {
    machines: FxHashMap<String, MachineProfile>,
}
impl MachineCatalog {
    pub fn find(&self, id: &str) -> Result<&MachineProfile, UnknownMachine> {
        self.machines
            .get(id)
            .ok_or_else(|| UnknownMachine(id.to_string()))
    }

    pub fn insert(&mut self, id: impl Into<String>, profile: MachineProfile) {
        self.machines.insert(id.into(), profile);
    }

    pub fn ids(&self) -> Vec<&str> {
        self.sorted().into_iter().map(|(id, _)| id).collect()
    }

    /// Entries in ascending id order.
    pub fn sorted(&self) -> Vec<(&str, &MachineProfile)> {
        let mut entries: Vec<_> = self
            .machines
            .iter()
            .map(|(id, profile)| (id.as_str(), profile))
            .collect();
        entries.sort_unstable_by_key(|(id, _)| *id);
        entries
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Reads a catalog from a JSON file and validates every option list.
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let catalog: MachineCatalog = file::read_json(path)?;
        for (id, profile) in &catalog.machines {
            profile.validate().map_err(|source| CatalogError::Invalid {
                machine: id.clone(),
                source,
            })?;
        }
        Ok(catalog)
    }

    /// The machines carried over from the original deployment's configuration.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.insert(
            "abc_magireco",
            MachineProfile::new("L マギアレコード 魔法少女まどか☆マギカ外伝", "magireco", 30, 32.6)
                .with_options(
                    Attr::Through,
                    &["不問", "0スルー", "1スルー", "2スルー", "3スルー", "4スルー", "5スルー以上"],
                )
                .with_options(Attr::AtGap, &["不問", "1～500G", "501～1,000G", "1,001G以上"])
                .with_options(Attr::PrevGame, &["不問", "1～500G", "501～1,000G", "1,001G以上"])
                .with_options(
                    Attr::PrevCoin,
                    &["不問", "1～1,000枚", "1,001～2,000枚", "2,001枚以上"],
                )
                .with_options(
                    Attr::PrevDiff,
                    &["不問", "-2,001枚以下", "-2,000～-1枚", "1～500枚", "501～1,000枚", "1,001枚以上"],
                )
                .with_options(Attr::PrevRenchan, &["不問", "1～3連", "4～7連", "8連以上"])
                .with_options(Attr::PrevType, &["不問", "下位", "上位"])
                .with_options(
                    Attr::Custom,
                    &["不問", "0スルー", "1スルー", "2スルー", "3スルー", "4スルー", "5スルー以上"],
                ),
        );
        catalog.insert(
            "hokuto",
            MachineProfile::new("L 北斗の拳", "hokuto", 40, 35.0)
                .with_options(
                    Attr::PrevGame,
                    &["不問", "1～400G", "401～800G", "801～1,000G", "1,001～1,300G", "1,301G以上"],
                )
                .with_options(
                    Attr::PrevCoin,
                    &["不問", "1～1,000枚", "1,001～2,000枚", "2,001枚以上"],
                )
                .with_options(
                    Attr::PrevDiff,
                    &[
                        "不問",
                        "-3,001枚以下",
                        "-3,000～-2,001枚",
                        "-2,000～-1,001枚",
                        "-1,000～-1枚",
                        "1～500枚",
                        "501～1,000枚",
                        "1,001～1,500枚",
                        "1,501枚以上",
                    ],
                )
                .with_options(Attr::PrevRenchan, &["不問", "1連", "2～5連", "5～9連", "10連以上"])
                .with_locked(&[Attr::Through, Attr::AtGap, Attr::PrevType, Attr::Custom]),
        );
        catalog.insert(
            "azurlane",
            MachineProfile::new("L アズールレーン THE ANIMETION", "azurlane", 40, 25.8)
                .with_options(
                    Attr::Through,
                    &["不問", "0スルー", "1スルー", "2スルー", "3スルー", "4スルー", "5スルー以上"],
                )
                .with_options(
                    Attr::AtGap,
                    &["不問", "1～250G", "251～500G", "501～750G", "751～1,000G", "1,001～1,250G", "1,251G以上"],
                )
                .with_options(Attr::PrevGame, &["不問", "1～500G", "501～1,000G", "1,001G以上"])
                .with_options(
                    Attr::PrevCoin,
                    &["不問", "1～1,000枚", "1,001～2,000枚", "2,001枚以上"],
                )
                .with_options(
                    Attr::PrevDiff,
                    &[
                        "不問",
                        "-3,001枚以下",
                        "-3,000～-2,001枚",
                        "-2,000～-1,001枚",
                        "-1,000～-1枚",
                        "1～500枚",
                        "501～1,000枚",
                        "1,001～1,500枚",
                        "1,501枚以上",
                    ],
                )
                .with_options(Attr::PrevRenchan, &["不問", "1連", "2～5連", "5～9連", "10連以上"])
                .with_locked(&[Attr::PrevType, Attr::Custom]),
        );
        catalog.insert(
            "zenigata5",
            MachineProfile::new("L 主役は銭形5", "zenigata5", 40, 32.2)
                .with_options(
                    Attr::PrevGame,
                    &["不問", "1～400G", "401～800G", "801～1,000G", "1,001G以上"],
                )
                .with_options(
                    Attr::PrevCoin,
                    &["不問", "1～1,000枚", "1,001～2,000枚", "2,001枚以上"],
                )
                .with_options(
                    Attr::PrevDiff,
                    &[
                        "不問",
                        "-3,001枚以下",
                        "-3,000～-2,001枚",
                        "-2,000～-1,001枚",
                        "-1,000～-1枚",
                        "1～500枚",
                        "501～1,000枚",
                        "1,001～1,500枚",
                        "1,501枚以上",
                    ],
                )
                .with_options(Attr::PrevRenchan, &["不問", "1連", "2～5連", "5～9連", "10連以上"])
                .with_locked(&[Attr::Through, Attr::AtGap, Attr::PrevType, Attr::Custom]),
        );
        catalog.insert(
            "babel",
            MachineProfile::new("L バベル", "babel", 40, 31.9)
                .with_options(
                    Attr::Through,
                    &["不問", "0スルー", "1スルー", "2スルー", "3スルー", "4スルー", "5スルー以上"],
                )
                .with_options(Attr::PrevGame, &["不問", "1～1,000G", "1,001～2,000G", "2,001G以上"])
                .with_options(
                    Attr::PrevCoin,
                    &["不問", "1～1,000枚", "1,001～2,000枚", "2,001枚以上"],
                )
                .with_options(Attr::PrevRenchan, &["不問", "1連", "2～5連", "5～9連", "10連以上"])
                .with_locked(&[Attr::AtGap, Attr::PrevDiff, Attr::PrevType, Attr::Custom]),
        );
        catalog
    }
}
