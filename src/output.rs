use std::error::Error;
use std::fmt::Write as _;

use itertools::Itertools;
use simple_error::bail;

use crate::boards::Board;
use crate::types::{Fixture, IoSettings, PinAttrs, REF_CLK_HZ, TICK_HZ, pcf_clock};

/// Clock buffer plus a counter dividing the board clock down to a 100 Hz
/// square wave on `tick`.
pub fn square_wave_gen(bufg_loc: &str) -> String {
    format!(
        r#"
    wire        clk_bufg;
    reg  [31:0] cnt_ps;
    reg         tick;

    (* LOC = "{bufg_loc}" *)
    BUFG bufg (.I(clk), .O(clk_bufg));

    initial cnt_ps <= 0;
    initial tick   <= 0;

    always @(posedge clk_bufg)
        if (cnt_ps >= ({REF_CLK_HZ} / (2*{TICK_HZ})) - 1) begin
            cnt_ps <= 0;
            tick   <= !tick;
        end else begin
            cnt_ps <= cnt_ps + 1;
            tick   <= tick;
        end
"#
    )
}

/// Generates a design which drives a 100 Hz square wave out of one OBUF per
/// slew and drive combination. The IOSTANDARD is common to all of them.
pub fn generate_output(
    board: &Board,
    iostandard: &str,
    drives: &[u32],
    slews: &[String],
) -> Result<Fixture, Box<dyn Error>> {
    if drives.is_empty() || slews.is_empty() {
        bail!("mode 'output' needs at least one --drive and one --slew value");
    }
    let num_ports = drives.len() * slews.len();
    let mut iosettings = IoSettings::default();

    let mut verilog = String::new();
    write!(
        verilog,
        r#"
module top(
    input  wire clk,
    output wire [{msb}:0] out
);
"#,
        msb = num_ports - 1
    )
    .unwrap();
    verilog.push_str(&square_wave_gen(board.bufg));

    let mut pcf = pcf_clock(board);

    for (index, (slew, &drive)) in slews.iter().cartesian_product(drives).enumerate() {
        let attrs = PinAttrs::output_attrs(iostandard, drive, slew);
        let pin = board.single_ended_pin(index)?;

        write!(
            verilog,
            r#"
    OBUF # ({params}) obuf_{index} (
    .I(tick),
    .O(out[{index}])
    );
"#,
            params = attrs.verilog_params()
        )
        .unwrap();

        if num_ports > 1 {
            writeln!(pcf, "set_io out[{index}] {pin}").unwrap();
        } else {
            writeln!(pcf, "set_io out {pin}").unwrap();
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

/// Same design as [`generate_output`], with OBUFDS buffers driving
/// differential pairs.
pub fn generate_diff_output(
    board: &Board,
    iostandard: &str,
    drives: &[u32],
    slews: &[String],
) -> Result<Fixture, Box<dyn Error>> {
    if drives.is_empty() || slews.is_empty() {
        bail!("mode 'diff_output' needs at least one --drive and one --slew value");
    }
    let num_ports = drives.len() * slews.len();
    let mut iosettings = IoSettings::default();

    let mut verilog = String::new();
    write!(
        verilog,
        r#"
module top(
    input  wire clk,
    output wire [{msb}:0] out_p,
    output wire [{msb}:0] out_n
);
"#,
        msb = num_ports - 1
    )
    .unwrap();
    verilog.push_str(&square_wave_gen(board.bufg));

    let mut pcf = pcf_clock(board);

    for (index, (slew, &drive)) in slews.iter().cartesian_product(drives).enumerate() {
        let attrs = PinAttrs::output_attrs(iostandard, drive, slew);
        let (pin_p, pin_n) = board.diff_pair(index)?;

        write!(
            verilog,
            r#"
    OBUFDS # ({params}) obuf_{index} (
    .I(tick),
    .O(out_p[{index}]),
    .OB(out_n[{index}])
    );
"#,
            params = attrs.verilog_params()
        )
        .unwrap();

        if num_ports > 1 {
            writeln!(pcf, "set_io out_p[{index}] {pin_p}").unwrap();
            writeln!(pcf, "set_io out_n[{index}] {pin_n}").unwrap();
        } else {
            writeln!(pcf, "set_io out_p {pin_p}").unwrap();
            writeln!(pcf, "set_io out_n {pin_n}").unwrap();
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
