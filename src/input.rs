use std::error::Error;
use std::fmt::Write as _;

use simple_error::bail;

use crate::boards::Board;
use crate::types::{Fixture, IoSettings, PinAttrs, pcf_clock};

/// Clock buffer alone; input designs register on the buffered clock but need
/// no tick generator.
fn clk_buffer(bufg_loc: &str) -> String {
    format!(
        r#"
    wire  clk_bufg;

    (* LOC = "{bufg_loc}" *)
    BUFG bufg (.I(clk), .O(clk_bufg));
"#
    )
}

/// Generates a design in which external pins go through IBUFs and registers
/// to the board LEDs. Each IBUF gets a different IN_TERM setting.
pub fn generate_input(
    board: &Board,
    iostandard: &str,
    in_terms: &[String],
) -> Result<Fixture, Box<dyn Error>> {
    if in_terms.is_empty() {
        bail!("mode 'input' needs at least one --in_term value");
    }
    let num_ports = in_terms.len();
    let mut iosettings = IoSettings::default();

    let mut verilog = String::new();
    write!(
        verilog,
        r#"
module top(
    input  wire clk,
    input  wire [{msb}:0] inp,
    output reg  [{msb}:0] led
);

    initial led <= 0;
"#,
        msb = num_ports - 1
    )
    .unwrap();
    verilog.push_str(&clk_buffer(board.bufg));

    let mut pcf = pcf_clock(board);

    for (index, in_term) in in_terms.iter().enumerate() {
        let attrs = PinAttrs::input_attrs(iostandard, in_term);
        let pin = board.single_ended_pin(index)?;
        let led = board.led_pin(index)?;

        write!(
            verilog,
            r#"
    wire inp_b[{index}];

    IBUF # ({params}) ibuf_{index} (
    .I(inp[{index}]),
    .O(inp_b[{index}])
    );

    always @(posedge clk_bufg)
        led[{index}] <= inp_b[{index}];
"#,
            params = attrs.verilog_params()
        )
        .unwrap();

        if num_ports > 1 {
            writeln!(pcf, "set_io inp[{index}] {pin}").unwrap();
            writeln!(pcf, "set_io led[{index}] {led}").unwrap();
        } else {
            writeln!(pcf, "set_io inp {pin}").unwrap();
            writeln!(pcf, "set_io led {led}").unwrap();
        }

        iosettings.insert(pin, attrs);
    }

    verilog.push_str("\nendmodule\n");

    Ok(Fixture {
        verilog,
        pcf,
        iosettings,
    })
}

/// Same design as [`generate_input`], with IBUFDS buffers receiving
/// differential pairs.
pub fn generate_diff_input(
    board: &Board,
    iostandard: &str,
    in_terms: &[String],
) -> Result<Fixture, Box<dyn Error>> {
    if in_terms.is_empty() {
        bail!("mode 'diff_input' needs at least one --in_term value");
    }
    let num_ports = in_terms.len();
    let mut iosettings = IoSettings::default();

    let mut verilog = String::new();
    write!(
        verilog,
        r#"
module top(
    input  wire clk,
    input  wire [{msb}:0] inp_p,
    input  wire [{msb}:0] inp_n,
    output reg  [{msb}:0] led
);

    initial led <= 0;
"#,
        msb = num_ports - 1
    )
    .unwrap();
    verilog.push_str(&clk_buffer(board.bufg));

    let mut pcf = pcf_clock(board);

    for (index, in_term) in in_terms.iter().enumerate() {
        let attrs = PinAttrs::input_attrs(iostandard, in_term);
        let (pin_p, pin_n) = board.diff_pair(index)?;
        let led = board.led_pin(index)?;

        write!(
            verilog,
            r#"
    wire inp_b[{index}];

    IBUFDS # ({params}) ibuf_{index} (
    .I(inp_p[{index}]),
    .IB(inp_n[{index}]),
    .O(inp_b[{index}])
    );

    always @(posedge clk_bufg)
        led[{index}] <= inp_b[{index}];
"#,
            params = attrs.verilog_params()
        )
        .unwrap();

        if num_ports > 1 {
            writeln!(pcf, "set_io inp_p[{index}] {pin_p}").unwrap();
            writeln!(pcf, "set_io inp_n[{index}] {pin_n}").unwrap();
            writeln!(pcf, "set_io led[{index}] {led}").unwrap();
        } else {
            writeln!(pcf, "set_io inp_p {pin_p}").unwrap();
            writeln!(pcf, "set_io inp_n {pin_n}").unwrap();
            writeln!(pcf, "set_io led {led}").unwrap();
        }

        iosettings.insert(pin_p, attrs.clone());
        iosettings.insert(pin_n, attrs);
    }

    verilog.push_str("\nendmodule\n");

    Ok(Fixture {
        verilog,
        pcf,
        iosettings,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::boards::get_board;
    use crate::types::AttrVal;

    fn strings(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_terminations() {
        let board = get_board("arty").unwrap();
        let fixture = generate_input(
            board,
            "LVCMOS33",
            &strings(&["NONE", "UNTUNED_SPLIT_50"]),
        )
        .unwrap();

        assert!(fixture.verilog.contains("input  wire [1:0] inp,\n"));
        assert!(fixture.verilog.contains("output reg  [1:0] led\n"));
        assert!(fixture.verilog.contains(
            "IBUF # (.IOSTANDARD(\"LVCMOS33\"),.IN_TERM(\"NONE\")) ibuf_0 ("
        ));
        assert!(fixture.verilog.contains(
            "IBUF # (.IOSTANDARD(\"LVCMOS33\"),.IN_TERM(\"UNTUNED_SPLIT_50\")) ibuf_1 ("
        ));

        assert!(fixture.pcf.starts_with("\nset_io clk E3\n"));
        assert!(fixture.pcf.contains("set_io inp[0] E15\n"));
        assert!(fixture.pcf.contains("set_io inp[1] E16\n"));
        assert!(fixture.pcf.contains("set_io led[0] G6\n"));
        assert!(fixture.pcf.contains("set_io led[1] G3\n"));

        // LED pins carry no electrical attributes and stay out of the manifest.
        let pins: Vec<_> = fixture.iosettings.pins.keys().collect();
        assert_eq!(pins, ["E15", "E16"]);
        assert_matches!(
            fixture.iosettings.pins["E16"].get("IN_TERM"),
            Some(AttrVal::Str(s)) if s == "UNTUNED_SPLIT_50"
        );
    }

    #[test]
    fn test_singular_naming() {
        let board = get_board("basys3").unwrap();
        let fixture = generate_input(board, "LVCMOS33", &strings(&["NONE"])).unwrap();
        assert!(fixture.pcf.contains("set_io inp A14\n"));
        assert!(fixture.pcf.contains("set_io led U16\n"));
        assert!(!fixture.pcf.contains("inp[0]"));
        assert!(!fixture.pcf.contains("led[0]"));
    }

    #[test]
    fn test_led_exhaustion() {
        // basys3-bottom has 12 single-ended pins but only 10 LED entries.
        let board = get_board("basys3-bottom").unwrap();
        let in_terms = strings(&[
            "NONE",
            "NONE",
            "NONE",
            "NONE",
            "NONE",
            "NONE",
            "NONE",
            "NONE",
            "NONE",
            "NONE",
            "NONE",
        ]);
        let err = generate_input(board, "LVCMOS33", &in_terms).unwrap_err();
        assert!(err.to_string().contains("LED pins"));
    }

    #[test]
    fn test_missing_in_terms() {
        let board = get_board("basys3").unwrap();
        assert!(generate_input(board, "LVCMOS33", &[]).is_err());
        assert!(generate_diff_input(board, "LVDS_25", &[]).is_err());
    }

    #[test]
    fn test_diff_input() {
        let board = get_board("basys3").unwrap();
        let fixture = generate_diff_input(
            board,
            "LVDS_25",
            &strings(&["NONE", "UNTUNED_SPLIT_50"]),
        )
        .unwrap();

        assert!(fixture.verilog.contains(
            "IBUFDS # (.IOSTANDARD(\"LVDS_25\"),.IN_TERM(\"NONE\")) ibuf_0 ("
        ));
        assert!(fixture.pcf.contains("set_io inp_p[0] A14\n"));
        assert!(fixture.pcf.contains("set_io inp_n[0] A15\n"));
        assert!(fixture.pcf.contains("set_io led[0] U16\n"));

        let pins: Vec<_> = fixture.iosettings.pins.keys().collect();
        assert_eq!(pins, ["A14", "A15", "A16", "A17"]);
        assert_eq!(
            fixture.iosettings.pins["A16"],
            fixture.iosettings.pins["A17"]
        );
    }

    #[test]
    fn test_diff_exhaustion() {
        let board = get_board("basys3-bottom").unwrap();
        let in_terms = strings(&["NONE", "NONE", "NONE", "NONE", "NONE"]);
        let err = generate_diff_input(board, "LVDS_25", &in_terms).unwrap_err();
        assert!(err.to_string().contains("differential pairs"));
    }
}
