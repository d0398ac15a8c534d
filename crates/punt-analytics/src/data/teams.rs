// Team color palette used by the play animation.

/// An sRGB color with 0-255 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BROWN: Rgb = Rgb::new(165, 42, 42);
    pub const DARK_ORANGE: Rgb = Rgb::new(255, 140, 0);

    /// Alpha-composite this color over `background`.
    pub fn over(self, background: Rgb, alpha: f64) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (fg as f64 * alpha + bg as f64 * (1.0 - alpha)).round() as u8
        };
        Rgb {
            r: mix(self.r, background.r),
            g: mix(self.g, background.g),
            b: mix(self.b, background.b),
        }
    }
}

/// Jersey (main) and trim (secondary) colors for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamColors {
    pub main: Rgb,
    pub secondary: Rgb,
}

const fn colors(main: (u8, u8, u8), secondary: (u8, u8, u8)) -> TeamColors {
    TeamColors {
        main: Rgb::new(main.0, main.1, main.2),
        secondary: Rgb::new(secondary.0, secondary.1, secondary.2),
    }
}

pub const TEAM_COLORS: &[(&str, TeamColors)] = &[
    ("ARI", colors((155, 35, 63), (255, 255, 255))),
    ("ATL", colors((0, 0, 0), (255, 255, 255))),
    ("BAL", colors((26, 25, 95), (255, 255, 255))),
    ("BUF", colors((0, 51, 141), (198, 12, 48))),
    ("CAR", colors((0, 133, 202), (16, 24, 32))),
    ("CHI", colors((11, 22, 42), (200, 56, 3))),
    ("CIN", colors((251, 79, 20), (255, 255, 255))),
    ("CLE", colors((255, 60, 0), (49, 29, 0))),
    ("DAL", colors((0, 34, 68), (134, 147, 151))),
    ("DEN", colors((0, 34, 68), (251, 79, 20))),
    ("DET", colors((0, 118, 182), (176, 183, 188))),
    ("GB", colors((24, 48, 40), (255, 184, 28))),
    ("HOU", colors((3, 32, 47), (167, 25, 48))),
    ("IND", colors((0, 44, 95), (162, 170, 173))),
    ("JAX", colors((0, 103, 120), (16, 24, 32))),
    ("KC", colors((227, 24, 55), (255, 255, 255))),
    ("LA", colors((0, 53, 148), (255, 209, 0))),
    ("LAC", colors((0, 42, 94), (255, 194, 14))),
    // Raiders after the 2020 relocation; same colors as OAK.
    ("LV", colors((0, 0, 0), (165, 172, 175))),
    ("MIA", colors((0, 142, 151), (252, 76, 2))),
    ("MIN", colors((79, 38, 131), (255, 255, 255))),
    ("NE", colors((0, 34, 68), (176, 183, 188))),
    ("NO", colors((211, 188, 141), (16, 24, 31))),
    ("NYG", colors((1, 35, 82), (163, 13, 45))),
    ("NYJ", colors((18, 87, 64), (255, 255, 255))),
    ("OAK", colors((0, 0, 0), (165, 172, 175))),
    ("PHI", colors((0, 76, 84), (165, 172, 175))),
    ("PIT", colors((16, 24, 32), (255, 182, 18))),
    ("SEA", colors((0, 34, 68), (105, 190, 40))),
    ("SF", colors((170, 0, 0), (173, 153, 93))),
    ("TB", colors((213, 10, 10), (10, 10, 8))),
    ("TEN", colors((12, 35, 64), (75, 146, 219))),
    ("WAS", colors((63, 16, 16), (255, 182, 18))),
];

/// Look up a team's colors by abbreviation (case-insensitive).
pub fn team_colors(abbr: &str) -> Option<TeamColors> {
    let abbr = abbr.trim();
    TEAM_COLORS
        .iter()
        .find(|(team, _)| team.eq_ignore_ascii_case(abbr))
        .map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_team_lookup() {
        let kc = team_colors("KC").unwrap();
        assert_eq!(kc.main, Rgb::new(227, 24, 55));
        assert_eq!(kc.secondary, Rgb::WHITE);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(team_colors("phi"), team_colors("PHI"));
    }

    #[test]
    fn raiders_resolve_under_both_abbreviations() {
        assert_eq!(TEAM_COLORS.len(), 33);
        assert_eq!(team_colors("LV"), team_colors("OAK"));
        assert!(team_colors("LV").is_some());
    }

    #[test]
    fn unknown_team_is_none() {
        assert!(team_colors("XYZ").is_none());
    }

    #[test]
    fn every_abbreviation_is_unique() {
        let mut seen = std::collections::HashSet::new();
        for (team, _) in TEAM_COLORS {
            assert!(seen.insert(*team), "duplicate team {team}");
        }
    }

    #[test]
    fn over_blends_with_background() {
        assert_eq!(Rgb::BLACK.over(Rgb::WHITE, 1.0), Rgb::BLACK);
        assert_eq!(Rgb::BLACK.over(Rgb::WHITE, 0.0), Rgb::WHITE);
        assert_eq!(Rgb::BLACK.over(Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
    }
}
