//! Static pinout data for the supported devboards.

use std::error::Error;

use simple_error::bail;

pub struct Board {
    pub name: &'static str,
    /// LOC constraint for the global clock buffer.
    pub bufg: &'static str,
    /// Package pin of the board oscillator input.
    pub clock: &'static str,
    pub leds: &'static [&'static str],
    pub single_ended: &'static [&'static str],
    pub diff_pairs: &'static [(&'static str, &'static str)],
}

pub const BOARDS: &[Board] = &[
    Board {
        name: "basys3",
        bufg: "BUFGCTRL_X0Y0",
        clock: "W5",
        leds: &[
            "U16", "E19", "U19", "V19", "W18", "U15", "U14", "V14", "V13", "V3", "W3", "U3", "P3",
            "N3", "P1", "L1",
        ],
        single_ended: &[
            // JB 1-4, 7-10
            "A14", "A16", "B15", "B16", "A15", "A17", "C15", "C16",
            // JC 1-4, 7-10
            "K17", "M18", "N17", "P18", "L17", "M19", "P17", "R18",
        ],
        diff_pairs: &[
            // JB
            ("A14", "A15"),
            ("A16", "A17"),
            ("C15", "B15"),
            ("B16", "C16"),
            // JC
            ("M19", "M18"),
            ("K17", "L17"),
            ("N17", "P17"),
            ("P18", "R18"),
        ],
    },
    Board {
        name: "arty",
        bufg: "BUFGCTRL_X0Y0",
        clock: "E3",
        leds: &[
            "G6",  // R0
            "G3",  // R1
            "J3",  // R2
            "K1",  // R3
            "F6",  // G0
            "J4",  // G1
            "J2",  // G2
            "H6",  // G3
            "E1",  // B0
            "G4",  // B1
            "H4",  // B2
            "K2",  // B3
            "H5",  // LED4
            "J5",  // LED5
            "T9",  // LED6
            "T10", // LED7
        ],
        single_ended: &[
            // Pmod JB
            "E15", "E16", "D15", "C15", "J17", "J18", "K15", "J15",
            // Pmod JC
            "U12", "V12", "V10", "V11", "U14", "V14", "T13", "U13",
        ],
        diff_pairs: &[
            // Pmod JB
            ("E15", "E16"),
            ("D15", "C15"),
            ("J17", "J18"),
            ("K15", "J15"),
            // Pmod JC
            ("U12", "V12"),
            ("V10", "V11"),
            ("U14", "V14"),
            ("T13", "U13"),
        ],
    },
    // Pinout constrained to the "bottom" routing graph of the 50t part.
    // The LED entries are not all wired to actual LEDs, so designs made
    // from this table are for CI checks rather than hardware bringup.
    Board {
        name: "basys3-bottom",
        bufg: "BUFGCTRL_X0Y0",
        clock: "W5",
        leds: &[
            "V3", // LED9
            "W3", // LED10
            "U3", // LED11
            "W7", // CA
            "W6", // CB
            "U8", // CC
            "V8", // CD
            "U5", // CE
            "V5", // CF
            "U7", // CG
        ],
        single_ended: &[
            // JC 1-4, 7-10
            "K17", "M18", "N17", "P18", "L17", "M19", "P17", "R18",
            // LEDs
            "U15", "U16", "V13", "V14",
        ],
        diff_pairs: &[
            // JC
            ("M18", "M19"),
            ("L17", "K17"),
            ("P17", "N17"),
            ("R18", "P18"),
        ],
    },
];

pub fn get_board(name: &str) -> Option<&'static Board> {
    BOARDS.iter().find(|board| board.name == name)
}

impl Board {
    pub fn single_ended_pin(&self, index: usize) -> Result<&'static str, Box<dyn Error>> {
        match self.single_ended.get(index) {
            Some(&pin) => Ok(pin),
            None => bail!(
                "board {} has only {} single-ended pins",
                self.name,
                self.single_ended.len()
            ),
        }
    }

    pub fn diff_pair(&self, index: usize) -> Result<(&'static str, &'static str), Box<dyn Error>> {
        match self.diff_pairs.get(index) {
            Some(&pair) => Ok(pair),
            None => bail!(
                "board {} has only {} differential pairs",
                self.name,
                self.diff_pairs.len()
            ),
        }
    }

    pub fn led_pin(&self, index: usize) -> Result<&'static str, Box<dyn Error>> {
        match self.leds.get(index) {
            Some(&pin) => Ok(pin),
            None => bail!("board {} has only {} LED pins", self.name, self.leds.len()),
        }
    }
}

#[test]
fn test_board_tables() {
    for board in BOARDS {
        assert!(!board.name.is_empty());
        assert!(!board.clock.is_empty());
        assert!(!board.bufg.is_empty());
        assert!(!board.leds.is_empty());
        assert!(!board.single_ended.is_empty());
        assert!(!board.diff_pairs.is_empty());
        for (pin_p, pin_n) in board.diff_pairs {
            assert_ne!(pin_p, pin_n);
        }
    }
}

#[test]
fn test_get_board() {
    assert_eq!(get_board("basys3").unwrap().clock, "W5");
    assert_eq!(get_board("arty").unwrap().clock, "E3");
    assert_eq!(get_board("basys3-bottom").unwrap().single_ended.len(), 12);
    assert!(get_board("nexys4").is_none());
}

#[test]
fn test_pin_exhaustion() {
    let board = get_board("basys3").unwrap();
    assert_eq!(board.single_ended_pin(0).unwrap(), "A14");
    assert_eq!(board.diff_pair(0).unwrap(), ("A14", "A15"));
    assert_eq!(board.led_pin(0).unwrap(), "U16");
    let err = board.single_ended_pin(16).unwrap_err();
    assert!(err.to_string().contains("16 single-ended pins"));
    assert!(board.diff_pair(8).is_err());
    assert!(board.led_pin(16).is_err());
}
