//! Database models

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Season used when a request does not name one
pub const DEFAULT_TEMPS: &str = "Ordinaire";

/// Liturgical role a chant is sung in
///
/// The serialized form is the key stored in the `type` column and used on the
/// wire (`Entree`, `Ordinaire`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChantType {
    Entree,
    Ordinaire,
    Offertoire,
    Communion,
    Sortie,
}

impl ChantType {
    /// All roles, in the order they occur during Mass
    pub const ALL: [ChantType; 5] = [
        ChantType::Entree,
        ChantType::Ordinaire,
        ChantType::Offertoire,
        ChantType::Communion,
        ChantType::Sortie,
    ];

    /// Key stored in the database and used in query strings
    pub fn key(self) -> &'static str {
        match self {
            ChantType::Entree => "Entree",
            ChantType::Ordinaire => "Ordinaire",
            ChantType::Offertoire => "Offertoire",
            ChantType::Communion => "Communion",
            ChantType::Sortie => "Sortie",
        }
    }

    /// Human-readable card title
    pub fn label(self) -> &'static str {
        match self {
            ChantType::Entree => "Entrée",
            ChantType::Ordinaire => "Ordinaire",
            ChantType::Offertoire => "Offertoire",
            ChantType::Communion => "Communion",
            ChantType::Sortie => "Sortie",
        }
    }
}

impl fmt::Display for ChantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ChantType {
    type Err = Error;

    /// Accepts the stored key, the accented label or the English role name,
    /// ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entree" | "entrée" | "entry" => Ok(ChantType::Entree),
            "ordinaire" | "ordinary" => Ok(ChantType::Ordinaire),
            "offertoire" | "offertory" => Ok(ChantType::Offertoire),
            "communion" => Ok(ChantType::Communion),
            "sortie" | "exit" => Ok(ChantType::Sortie),
            _ => Err(Error::InvalidInput(format!("Unknown chant type: {}", s))),
        }
    }
}

impl TryFrom<String> for ChantType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Song record as stored in the `chants` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Chant {
    pub id: i64,
    pub nom: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub chant_type: ChantType,
    pub temps: String,
    /// Number in the parish songbook
    pub numero_carnet: Option<i64>,
    /// Link to the sheet music
    pub lien_partition: Option<String>,
}

/// One suggestion slot per role
///
/// Always serializes with exactly five keys; an empty slot is `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Propositions {
    #[serde(rename = "Entree")]
    pub entree: Option<Chant>,
    #[serde(rename = "Ordinaire")]
    pub ordinaire: Option<Chant>,
    #[serde(rename = "Offertoire")]
    pub offertoire: Option<Chant>,
    #[serde(rename = "Communion")]
    pub communion: Option<Chant>,
    #[serde(rename = "Sortie")]
    pub sortie: Option<Chant>,
}

impl Propositions {
    pub fn get(&self, chant_type: ChantType) -> Option<&Chant> {
        self.slot(chant_type).as_ref()
    }

    pub fn set(&mut self, chant_type: ChantType, chant: Option<Chant>) {
        *self.slot_mut(chant_type) = chant;
    }

    fn slot(&self, chant_type: ChantType) -> &Option<Chant> {
        match chant_type {
            ChantType::Entree => &self.entree,
            ChantType::Ordinaire => &self.ordinaire,
            ChantType::Offertoire => &self.offertoire,
            ChantType::Communion => &self.communion,
            ChantType::Sortie => &self.sortie,
        }
    }

    fn slot_mut(&mut self, chant_type: ChantType) -> &mut Option<Chant> {
        match chant_type {
            ChantType::Entree => &mut self.entree,
            ChantType::Ordinaire => &mut self.ordinaire,
            ChantType::Offertoire => &mut self.offertoire,
            ChantType::Communion => &mut self.communion,
            ChantType::Sortie => &mut self.sortie,
        }
    }
}

impl FromIterator<(ChantType, Option<Chant>)> for Propositions {
    fn from_iter<I: IntoIterator<Item = (ChantType, Option<Chant>)>>(iter: I) -> Self {
        let mut propositions = Propositions::default();
        for (chant_type, chant) in iter {
            propositions.set(chant_type, chant);
        }
        propositions
    }
}
