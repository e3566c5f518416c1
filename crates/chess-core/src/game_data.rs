//! Typed game model built from a Lichess game export, plus the small
//! formatting helpers the report needs for individual moves.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Side to move after `ply` half-moves have been played.
    pub fn to_move_after(ply: u32) -> Side {
        if ply % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub id: String,
}

/// Per-player totals from the server-side analysis. Missing counters are -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub inaccuracy: i32,
    pub mistake: i32,
    pub blunder: i32,
    pub acpl: i32,
}

impl Default for AnalysisSummary {
    fn default() -> Self {
        Self {
            inaccuracy: -1,
            mistake: -1,
            blunder: -1,
            acpl: -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub color: Side,
    pub user: Identity,
    pub rating: i32,
    pub rating_diff: i32,
    pub analysis: Option<AnalysisSummary>,
}

impl PlayerRecord {
    pub const MAX_NAME_CHARS: usize = 25;

    /// Display name cut to [`Self::MAX_NAME_CHARS`] characters.
    pub fn short_name(&self) -> String {
        self.user.name.chars().take(Self::MAX_NAME_CHARS).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Inaccuracy,
    Mistake,
    Blunder,
    Other(String),
}

impl Severity {
    /// Lichess sends "Inaccuracy", "Mistake" or "Blunder"; case is ignored.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "inaccuracy" => Severity::Inaccuracy,
            "mistake" => Severity::Mistake,
            "blunder" => Severity::Blunder,
            _ => Severity::Other(name.to_string()),
        }
    }

    /// Annotation glyph appended to the SAN of a judged move.
    pub fn suffix(&self) -> &'static str {
        match self {
            Severity::Inaccuracy => "?!",
            Severity::Mistake => "?",
            Severity::Blunder => "??",
            Severity::Other(_) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Judgment {
    pub severity: Severity,
    pub comment: String,
}

/// Engine annotation for one ply. `eval` and `mate` are never both set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveAnnotation {
    /// Centipawns, white's point of view.
    pub eval: Option<i32>,
    pub mate: Option<i32>,
    pub best: Option<String>,
    pub variation: Option<String>,
    pub judgment: Option<Judgment>,
}

impl MoveAnnotation {
    pub fn is_present(&self) -> bool {
        self.eval.is_some()
            || self.mate.is_some()
            || self.best.is_some()
            || self.variation.is_some()
            || self.judgment.is_some()
    }

    /// `#N` for a forced mate, signed pawns for an evaluation, else empty.
    pub fn evaluation_display(&self) -> String {
        if let Some(mate) = self.mate {
            format!("#{mate}")
        } else if let Some(cp) = self.eval {
            centipawns_to_pawns(cp)
        } else {
            String::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub san: String,
    /// Clock after the move, in centiseconds.
    pub clock: i64,
    /// Centiseconds spent on this move.
    pub thinking_time: i64,
    pub annotation: Option<MoveAnnotation>,
}

impl MoveRecord {
    pub fn judgment(&self) -> Option<&Judgment> {
        self.annotation.as_ref()?.judgment.as_ref()
    }

    /// Raw SAN with the judgment glyph appended once.
    pub fn decorated(&self) -> String {
        match self.judgment() {
            Some(judgment) => format!("{}{}", self.san, judgment.severity.suffix()),
            None => self.san.clone(),
        }
    }

    pub fn evaluation_display(&self) -> String {
        self.annotation
            .as_ref()
            .map(MoveAnnotation::evaluation_display)
            .unwrap_or_default()
    }

    pub fn clock_display(&self) -> String {
        format_centiseconds(self.clock)
    }

    pub fn thinking_time_display(&self) -> String {
        format_centiseconds(self.thinking_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovePair {
    pub white: MoveRecord,
    pub black: Option<MoveRecord>,
}

impl MovePair {
    pub fn get(&self, side: Side) -> Option<&MoveRecord> {
        match side {
            Side::White => Some(&self.white),
            Side::Black => self.black.as_ref(),
        }
    }
}

/// Time control in seconds; every field is -1 for untimed games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockConfig {
    pub initial: i32,
    pub increment: i32,
    pub total_time: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            initial: -1,
            increment: -1,
            total_time: -1,
        }
    }
}

impl ClockConfig {
    /// "minutes+increment", e.g. "5+3". Minutes use floor division.
    pub fn time_control(&self) -> String {
        format!("{}+{}", self.initial.div_euclid(60), self.increment)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseBoundaries {
    pub middle: Option<u32>,
    pub end: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStart {
    pub move_number: u32,
    pub side: Side,
}

impl PhaseStart {
    pub fn from_ply(ply: u32) -> Self {
        Self {
            move_number: ply / 2 + 1,
            side: Side::to_move_after(ply),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpeningInfo {
    pub eco: String,
    pub name: String,
    pub ply: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub id: String,
    pub variant: String,
    pub speed: String,
    /// Epoch milliseconds, -1 when unknown.
    pub created_at: i64,
    pub last_move_at: i64,
    pub status: String,
    pub rated: bool,
    pub white: PlayerRecord,
    pub black: PlayerRecord,
    pub winner: Option<Side>,
    pub moves: Vec<MovePair>,
    pub clock: ClockConfig,
    pub division: PhaseBoundaries,
    pub opening: OpeningInfo,
    pub has_analysis: bool,
}

impl GameRecord {
    pub fn player(&self, side: Side) -> &PlayerRecord {
        match side {
            Side::White => &self.white,
            Side::Black => &self.black,
        }
    }

    /// Every ply in game order.
    pub fn plies(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves
            .iter()
            .flat_map(|pair| std::iter::once(&pair.white).chain(pair.black.as_ref()))
    }

    pub fn ply_count(&self) -> usize {
        self.plies().count()
    }

    /// "1", "0" or "½" for `side`.
    pub fn score(&self, side: Side) -> &'static str {
        match self.winner {
            Some(winner) if winner == side => "1",
            Some(_) => "0",
            None => "½",
        }
    }

    /// Sum of the thinking time of every move played by `side`.
    pub fn total_thinking_time(&self, side: Side) -> i64 {
        self.moves
            .iter()
            .filter_map(|pair| pair.get(side))
            .map(|mv| mv.thinking_time)
            .sum()
    }
}

/// Format centiseconds as `H:MM:SS.s`, leaving out the hours when zero.
pub fn format_centiseconds(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    // Nearest tenth; 59.99s carries to 1:00.0.
    let tenths = (value.unsigned_abs() + 5) / 10;
    let hours = tenths / 36_000;
    let minutes = tenths % 36_000 / 600;
    let seconds = tenths % 600 / 10;
    let tenth = tenths % 10;

    if hours > 0 {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}.{tenth}")
    } else {
        format!("{sign}{minutes:02}:{seconds:02}.{tenth}")
    }
}

fn centipawns_to_pawns(cp: i32) -> String {
    let pawns = (f64::from(cp) / 100.0).to_string();
    if pawns.contains('.') {
        pawns
    } else {
        format!("{pawns}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(san: &str, judgment: Option<&str>) -> MoveRecord {
        MoveRecord {
            san: san.to_string(),
            clock: 0,
            thinking_time: 0,
            annotation: judgment.map(|name| MoveAnnotation {
                judgment: Some(Judgment {
                    severity: Severity::from_name(name),
                    comment: String::new(),
                }),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_decoration_by_severity() {
        assert_eq!(mv("Nf3", Some("Inaccuracy")).decorated(), "Nf3?!");
        assert_eq!(mv("Nf3", Some("Mistake")).decorated(), "Nf3?");
        assert_eq!(mv("Nf3", Some("blunder")).decorated(), "Nf3??");
        assert_eq!(mv("Nf3", Some("Good")).decorated(), "Nf3");
        assert_eq!(mv("Nf3", None).decorated(), "Nf3");
    }

    #[test]
    fn test_decoration_applies_once() {
        let blunder = mv("Qxf7#", Some("Blunder"));
        assert_eq!(blunder.decorated(), "Qxf7#??");
        assert_eq!(blunder.decorated(), blunder.decorated());
        assert_eq!(blunder.san, "Qxf7#");
    }

    #[test]
    fn test_format_centiseconds() {
        assert_eq!(format_centiseconds(30_000), "05:00.0");
        assert_eq!(format_centiseconds(12_345), "02:03.5");
        assert_eq!(format_centiseconds(12_344), "02:03.4");
        assert_eq!(format_centiseconds(5_999), "01:00.0");
        assert_eq!(format_centiseconds(359_996), "1:00:00.0");
        assert_eq!(format_centiseconds(0), "00:00.0");
        assert_eq!(format_centiseconds(360_000), "1:00:00.0");
        assert_eq!(format_centiseconds(1_086_050), "3:01:00.5");
        assert_eq!(format_centiseconds(-250), "-00:02.5");

        let played = MoveRecord {
            clock: 17_450,
            thinking_time: 1_230,
            ..mv("Nf3", None)
        };
        assert_eq!(played.clock_display(), "02:54.5");
        assert_eq!(played.thinking_time_display(), "00:12.3");
    }

    #[test]
    fn test_evaluation_display() {
        let eval = |cp| MoveAnnotation {
            eval: Some(cp),
            ..Default::default()
        };
        assert_eq!(eval(150).evaluation_display(), "1.5");
        assert_eq!(eval(-30).evaluation_display(), "-0.3");
        assert_eq!(eval(100).evaluation_display(), "1.0");
        assert_eq!(eval(0).evaluation_display(), "0.0");
        assert_eq!(eval(1234).evaluation_display(), "12.34");

        let mate = MoveAnnotation {
            mate: Some(-3),
            ..Default::default()
        };
        assert_eq!(mate.evaluation_display(), "#-3");
        assert_eq!(MoveAnnotation::default().evaluation_display(), "");
    }

    #[test]
    fn test_annotation_presence() {
        assert!(!MoveAnnotation::default().is_present());
        let best_only = MoveAnnotation {
            best: Some("g1f3".to_string()),
            ..Default::default()
        };
        assert!(best_only.is_present());
    }

    #[test]
    fn test_phase_start() {
        assert_eq!(
            PhaseStart::from_ply(0),
            PhaseStart { move_number: 1, side: Side::White }
        );
        assert_eq!(
            PhaseStart::from_ply(1),
            PhaseStart { move_number: 1, side: Side::Black }
        );
        assert_eq!(
            PhaseStart::from_ply(40),
            PhaseStart { move_number: 21, side: Side::White }
        );
    }

    #[test]
    fn test_time_control() {
        let blitz = ClockConfig {
            initial: 300,
            increment: 3,
            total_time: 420,
        };
        assert_eq!(blitz.time_control(), "5+3");
        assert_eq!(ClockConfig::default().time_control(), "-1+-1");
    }

    #[test]
    fn test_short_name() {
        let player = PlayerRecord {
            color: Side::White,
            user: Identity {
                name: "a".repeat(40),
                id: "a".to_string(),
            },
            rating: 1500,
            rating_diff: 0,
            analysis: None,
        };
        assert_eq!(player.short_name().chars().count(), 25);
    }
}
