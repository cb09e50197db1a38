use std::error::Error;
use std::fmt::Write as _;

use itertools::Itertools;
use simple_error::bail;

use crate::boards::Board;
use crate::types::{Fixture, IoSettings, PinAttrs, REF_CLK_HZ, TICK_HZ, pcf_clock};

/// Control generator shared by all bidirectional buffers: cycles the pins
/// through L, Z, H, Z at 100 Hz per phase, and latches the externally driven
/// level into the LED register whenever the buffers are tristated.
fn cycle_gen(bufg_loc: &str) -> String {
    format!(
        r#"
    wire        clk_bufg;
    reg  [31:0] cnt_ps;

    (* LOC = "{bufg_loc}" *)
    BUFG bufg (.I(clk), .O(clk_bufg));

    initial cnt_ps <= 32'd0;
    initial ino_o  <= 1'b0;
    initial ino_t  <= 1'b1;

    always @(posedge clk_bufg)
        if (cnt_ps >= ({REF_CLK_HZ} / (2*{TICK_HZ})) - 1) begin
            cnt_ps <= 0;
            ino_t  <= !ino_t;
            if (ino_t == 1'b1)
                ino_o <= !ino_o;
        end else begin
            cnt_ps <= cnt_ps + 1;
            ino_t  <= ino_t;
            ino_o  <= ino_o;
        end

    always @(posedge clk_bufg)
        if (ino_t == 1'b1)
            led <= ino_i;
        else
            led <= led;
"#
    )
}

/// Generates a design with IOBUFs cycling through L, Z, H, Z states, one
/// buffer per slew and drive combination.
pub fn generate_inout(
    board: &Board,
    iostandard: &str,
    drives: &[u32],
    slews: &[String],
) -> Result<Fixture, Box<dyn Error>> {
    if drives.is_empty() || slews.is_empty() {
        bail!("mode 'inout' needs at least one --drive and one --slew value");
    }
    let num_ports = drives.len() * slews.len();
    let mut iosettings = IoSettings::default();

    let mut verilog = String::new();
    write!(
        verilog,
        r#"
module top(
    input  wire clk,
    inout  wire [{msb}:0] ino,
    output reg  [{msb}:0] led
);

    initial led <= 0;

    wire [{msb}:0] ino_i;
    reg ino_o;
    reg ino_t;
"#,
        msb = num_ports - 1
    )
    .unwrap();
    verilog.push_str(&cycle_gen(board.bufg));

    let mut pcf = pcf_clock(board);

    for (index, (slew, &drive)) in slews.iter().cartesian_product(drives).enumerate() {
        let attrs = PinAttrs::output_attrs(iostandard, drive, slew);
        let pin = board.single_ended_pin(index)?;
        let led = board.led_pin(index)?;

        write!(
            verilog,
            r#"
    IOBUF # ({params}) iobuf_{index} (
    .I(ino_o),
    .O(ino_i[{index}]),
    .T(ino_t),
    .IO(ino[{index}])
    );
"#,
            params = attrs.verilog_params()
        )
        .unwrap();

        if num_ports > 1 {
            writeln!(pcf, "set_io ino[{index}] {pin}").unwrap();
            writeln!(pcf, "set_io led[{index}] {led}").unwrap();
        } else {
            writeln!(pcf, "set_io ino {pin}").unwrap();
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

/// Same design as [`generate_inout`], with IOBUFDS buffers on differential
/// pairs.
pub fn generate_diff_inout(
    board: &Board,
    iostandard: &str,
    drives: &[u32],
    slews: &[String],
) -> Result<Fixture, Box<dyn Error>> {
    if drives.is_empty() || slews.is_empty() {
        bail!("mode 'diff_inout' needs at least one --drive and one --slew value");
    }
    let num_ports = drives.len() * slews.len();
    let mut iosettings = IoSettings::default();

    let mut verilog = String::new();
    write!(
        verilog,
        r#"
module top(
    input  wire clk,
    inout  wire [{msb}:0] ino_p,
    inout  wire [{msb}:0] ino_n,
    output reg  [{msb}:0] led
);

    initial led <= 0;

    wire [{msb}:0] ino_i;
    reg ino_o;
    reg ino_t;
"#,
        msb = num_ports - 1
    )
    .unwrap();
    verilog.push_str(&cycle_gen(board.bufg));

    let mut pcf = pcf_clock(board);

    for (index, (slew, &drive)) in slews.iter().cartesian_product(drives).enumerate() {
        let attrs = PinAttrs::output_attrs(iostandard, drive, slew);
        let (pin_p, pin_n) = board.diff_pair(index)?;
        let led = board.led_pin(index)?;

        write!(
            verilog,
            r#"
    IOBUFDS # ({params}) iobuf_{index} (
    .I(ino_o),
    .O(ino_i[{index}]),
    .T(ino_t),
    .IO(ino_p[{index}]),
    .IOB(ino_n[{index}])
    );
"#,
            params = attrs.verilog_params()
        )
        .unwrap();

        if num_ports > 1 {
            writeln!(pcf, "set_io ino_p[{index}] {pin_p}").unwrap();
            writeln!(pcf, "set_io ino_n[{index}] {pin_n}").unwrap();
            writeln!(pcf, "set_io led[{index}] {led}").unwrap();
        } else {
            writeln!(pcf, "set_io ino_p {pin_p}").unwrap();
            writeln!(pcf, "set_io ino_n {pin_n}").unwrap();
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
    fn test_single_combination() {
        let board = get_board("basys3").unwrap();
        let fixture = generate_inout(board, "LVCMOS33", &[12], &strings(&["SLOW"])).unwrap();

        assert!(fixture.verilog.contains("inout  wire [0:0] ino,\n"));
        assert!(fixture.verilog.contains(
            "IOBUF # (.IOSTANDARD(\"LVCMOS33\"),.DRIVE(12),.SLEW(\"SLOW\")) iobuf_0 ("
        ));
        // The 4-phase cycle: output toggles on every other tristate flip,
        // LEDs sample while tristated.
        assert!(fixture.verilog.contains("initial ino_t  <= 1'b1;"));
        assert!(fixture.verilog.contains("ino_o <= !ino_o;"));
        assert!(fixture.verilog.contains("led <= ino_i;"));

        assert!(fixture.pcf.contains("set_io ino A14\n"));
        assert!(fixture.pcf.contains("set_io led U16\n"));
        assert!(!fixture.pcf.contains("ino[0]"));

        let pins: Vec<_> = fixture.iosettings.pins.keys().collect();
        assert_eq!(pins, ["A14"]);
    }

    #[test]
    fn test_indexed_naming() {
        let board = get_board("arty").unwrap();
        let fixture =
            generate_inout(board, "LVCMOS25", &[4, 8], &strings(&["SLOW", "FAST"])).unwrap();

        assert!(fixture.pcf.contains("set_io ino[0] E15\n"));
        assert!(fixture.pcf.contains("set_io led[0] G6\n"));
        assert!(fixture.pcf.contains("set_io ino[3] C15\n"));
        assert!(fixture.pcf.contains("set_io led[3] K1\n"));

        assert_eq!(fixture.iosettings.pins.len(), 4);
        assert_matches!(
            fixture.iosettings.pins["C15"].get("DRIVE"),
            Some(AttrVal::Int(8))
        );
        assert_matches!(
            fixture.iosettings.pins["C15"].get("SLEW"),
            Some(AttrVal::Str(s)) if s == "FAST"
        );
    }

    #[test]
    fn test_led_exhaustion() {
        let board = get_board("basys3-bottom").unwrap();
        let drives: Vec<u32> = (1..=11).collect();
        let err = generate_inout(board, "LVCMOS33", &drives, &strings(&["SLOW"])).unwrap_err();
        assert!(err.to_string().contains("LED pins"));
    }

    #[test]
    fn test_diff_inout() {
        let board = get_board("basys3").unwrap();
        let fixture =
            generate_diff_inout(board, "BLVDS_25", &[0], &strings(&["SLOW", "FAST"])).unwrap();

        assert!(fixture.verilog.contains("inout  wire [1:0] ino_p,\n"));
        assert!(fixture.verilog.contains(
            "IOBUFDS # (.IOSTANDARD(\"BLVDS_25\"),.SLEW(\"SLOW\")) iobuf_0 ("
        ));
        assert!(fixture.pcf.contains("set_io ino_p[0] A14\n"));
        assert!(fixture.pcf.contains("set_io ino_n[0] A15\n"));
        assert!(fixture.pcf.contains("set_io led[0] U16\n"));

        let pins: Vec<_> = fixture.iosettings.pins.keys().collect();
        assert_eq!(pins, ["A14", "A15", "A16", "A17"]);
        assert_eq!(
            fixture.iosettings.pins["A14"],
            fixture.iosettings.pins["A15"]
        );
    }
}
