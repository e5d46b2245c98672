use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six RIASEC interest dimensions, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "R")]
    Realistic,
    #[serde(rename = "I")]
    Investigative,
    #[serde(rename = "A")]
    Artistic,
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "E")]
    Enterprising,
    #[serde(rename = "C")]
    Conventional,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Realistic,
        Dimension::Investigative,
        Dimension::Artistic,
        Dimension::Social,
        Dimension::Enterprising,
        Dimension::Conventional,
    ];

    /// Position on the RIASEC hexagon, `0..=5`.
    pub fn rank(self) -> usize {
        match self {
            Dimension::Realistic => 0,
            Dimension::Investigative => 1,
            Dimension::Artistic => 2,
            Dimension::Social => 3,
            Dimension::Enterprising => 4,
            Dimension::Conventional => 5,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Dimension::Realistic => 'R',
            Dimension::Investigative => 'I',
            Dimension::Artistic => 'A',
            Dimension::Social => 'S',
            Dimension::Enterprising => 'E',
            Dimension::Conventional => 'C',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Realistic => "Realistic",
            Dimension::Investigative => "Investigative",
            Dimension::Artistic => "Artistic",
            Dimension::Social => "Social",
            Dimension::Enterprising => "Enterprising",
            Dimension::Conventional => "Conventional",
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'R' => Some(Dimension::Realistic),
            'I' => Some(Dimension::Investigative),
            'A' => Some(Dimension::Artistic),
            'S' => Some(Dimension::Social),
            'E' => Some(Dimension::Enterprising),
            'C' => Some(Dimension::Conventional),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a RIASEC dimension (expected one of R, I, A, S, E, C)")]
pub struct InvalidDimension(pub String);

impl FromStr for Dimension {
    type Err = InvalidDimension;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Dimension::from_letter(letter.to_ascii_uppercase())
                .ok_or_else(|| InvalidDimension(value.to_string())),
            _ => Err(InvalidDimension(value.to_string())),
        }
    }
}

/// How strongly the respondent identifies with a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AnswerWeight {
    NotAtAll,
    ALittle,
    ALot,
}

impl AnswerWeight {
    pub fn points(self) -> u32 {
        match self {
            AnswerWeight::NotAtAll => 0,
            AnswerWeight::ALittle => 1,
            AnswerWeight::ALot => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnswerWeight::NotAtAll => "Pas du tout",
            AnswerWeight::ALittle => "Un peu",
            AnswerWeight::ALot => "Beaucoup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("answer weight must be 0, 1 or 2 (got {0})")]
pub struct InvalidAnswerWeight(pub u8);

impl TryFrom<u8> for AnswerWeight {
    type Error = InvalidAnswerWeight;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AnswerWeight::NotAtAll),
            1 => Ok(AnswerWeight::ALittle),
            2 => Ok(AnswerWeight::ALot),
            other => Err(InvalidAnswerWeight(other)),
        }
    }
}

impl From<AnswerWeight> for u8 {
    fn from(value: AnswerWeight) -> Self {
        value.points() as u8
    }
}

/// Quiz item as loaded from the question catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub display_order: u32,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    pub dimension: Dimension,
}

/// Accumulated points per dimension. Always carries all six dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreMap {
    points: [u32; 6],
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: Dimension) -> u32 {
        self.points[dimension.rank()]
    }

    pub fn set(&mut self, dimension: Dimension, points: u32) {
        self.points[dimension.rank()] = points;
    }

    pub fn add(&mut self, dimension: Dimension, points: u32) {
        let slot = &mut self.points[dimension.rank()];
        *slot = slot.saturating_add(points);
    }

    pub fn total(&self) -> u32 {
        self.points.iter().sum()
    }

    /// `(dimension, points)` pairs in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (Dimension, u32)> + '_ {
        Dimension::ALL
            .iter()
            .map(move |dimension| (*dimension, self.get(*dimension)))
    }
}

impl FromIterator<(Dimension, u32)> for ScoreMap {
    fn from_iter<T: IntoIterator<Item = (Dimension, u32)>>(iter: T) -> Self {
        let mut scores = ScoreMap::new();
        for (dimension, points) in iter {
            scores.add(dimension, points);
        }
        scores
    }
}

impl Serialize for ScoreMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Dimension::ALL.len()))?;
        for (dimension, points) in self.entries() {
            map.serialize_entry(&dimension, &points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScoreMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = std::collections::BTreeMap::<Dimension, u32>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// Three distinct dimensions ranked by score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileCode([Dimension; 3]);

impl ProfileCode {
    /// Returns `None` unless the three letters are distinct.
    pub fn new(first: Dimension, second: Dimension, third: Dimension) -> Option<Self> {
        if first == second || first == third || second == third {
            return None;
        }
        Some(Self([first, second, third]))
    }

    pub fn letters(&self) -> [Dimension; 3] {
        self.0
    }

    pub fn primary(&self) -> Dimension {
        self.0[0]
    }
}

impl fmt::Display for ProfileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dimension in self.0 {
            write!(f, "{dimension}")?;
        }
        Ok(())
    }
}

impl FromStr for ProfileCode {
    type Err = InvalidDimension;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = ProgramCode::parse(value).ok_or_else(|| InvalidDimension(value.to_string()))?;
        match code.letters() {
            [first, second, third] => ProfileCode::new(*first, *second, *third)
                .ok_or_else(|| InvalidDimension(value.to_string())),
            _ => Err(InvalidDimension(value.to_string())),
        }
    }
}

impl Serialize for ProfileCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Validated program code: one to three RIASEC letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramCode(Vec<Dimension>);

impl ProgramCode {
    pub const MAX_LETTERS: usize = 3;

    /// Lenient parse: trims and uppercases, rejects anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let letters = raw
            .trim()
            .chars()
            .map(|letter| Dimension::from_letter(letter.to_ascii_uppercase()))
            .collect::<Option<Vec<_>>>()?;

        if letters.is_empty() || letters.len() > Self::MAX_LETTERS {
            return None;
        }
        Some(Self(letters))
    }

    pub fn letters(&self) -> &[Dimension] {
        &self.0
    }
}

impl fmt::Display for ProgramCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dimension in &self.0 {
            write!(f, "{dimension}")?;
        }
        Ok(())
    }
}

impl Serialize for ProgramCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Academic program row from the catalog. The code is kept raw; the matcher
/// validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRecord {
    pub name: String,
    pub institution: String,
    pub code: String,
}

impl ProgramRecord {
    pub fn new(
        name: impl Into<String>,
        institution: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            institution: institution.into(),
            code: code.into(),
        }
    }

    pub fn parsed_code(&self) -> Option<ProgramCode> {
        ProgramCode::parse(&self.code)
    }
}

/// A catalog record scored against a profile. Lower distance is better.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub name: String,
    pub institution: String,
    pub code: ProgramCode,
    pub distance: u32,
}
