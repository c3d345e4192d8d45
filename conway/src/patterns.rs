// patterns.rs - Named starting patterns

use crate::error::ConfigError;

/// Live cells of a pattern as `(x, y)` offsets from its top-left corner.
#[derive(Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(isize, isize)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "Blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "Toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "Beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        name: "Pulsar",
        cells: &[
            // Top half
            (2, 0), (3, 0), (4, 0), (8, 0), (9, 0), (10, 0),
            (0, 2), (5, 2), (7, 2), (12, 2),
            (0, 3), (5, 3), (7, 3), (12, 3),
            (0, 4), (5, 4), (7, 4), (12, 4),
            (2, 5), (3, 5), (4, 5), (8, 5), (9, 5), (10, 5),
            // Bottom half (mirrored)
            (2, 7), (3, 7), (4, 7), (8, 7), (9, 7), (10, 7),
            (0, 8), (5, 8), (7, 8), (12, 8),
            (0, 9), (5, 9), (7, 9), (12, 9),
            (0, 10), (5, 10), (7, 10), (12, 10),
            (2, 12), (3, 12), (4, 12), (8, 12), (9, 12), (10, 12),
        ],
    },
    Pattern {
        name: "R-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Gosper Glider Gun",
        cells: &[
            (24, 0),
            (22, 1), (24, 1),
            (12, 2), (13, 2), (20, 2), (21, 2), (34, 2), (35, 2),
            (11, 3), (15, 3), (20, 3), (21, 3), (34, 3), (35, 3),
            (0, 4), (1, 4), (10, 4), (16, 4), (20, 4), (21, 4),
            (0, 5), (1, 5), (10, 5), (14, 5), (16, 5), (17, 5), (22, 5), (24, 5),
            (10, 6), (16, 6), (24, 6),
            (11, 7), (15, 7),
            (12, 8), (13, 8),
        ],
    },
];

impl Pattern {
    /// Looks a pattern up by name, ignoring case, spaces and dashes.
    pub fn find(name: &str) -> Result<&'static Pattern, ConfigError> {
        let wanted = normalize(name);
        PATTERNS
            .iter()
            .find(|pattern| normalize(pattern.name) == wanted)
            .ok_or_else(|| ConfigError::UnknownPattern(name.to_string()))
    }

    /// Width and height of the bounding box.
    pub fn extent(&self) -> (isize, isize) {
        let width = self.cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
        let height = self.cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
        (width, height)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_patterns_loosely() {
        assert_eq!(Pattern::find("gosper-glider_gun").unwrap().cells.len(), 36);
        assert_eq!(Pattern::find("RPentomino").unwrap().name, "R-pentomino");
        assert!(matches!(Pattern::find("spaceship"), Err(ConfigError::UnknownPattern(_))));
    }

    #[test]
    fn extents_match_shapes() {
        assert_eq!(Pattern::find("blinker").unwrap().extent(), (3, 1));
        assert_eq!(Pattern::find("pulsar").unwrap().extent(), (13, 13));
        assert_eq!(Pattern::find("glider").unwrap().extent(), (3, 3));
    }
}
