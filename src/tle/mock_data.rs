//! Mock TLE data for testing purposes.

pub const ISS_TLE: &str = r#"
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
"#;

pub const STARLINK_TLE: &str = r#"
STARLINK-1007
1 44713U 19074A   24226.50000000  .00001234  00000-0  10000-3 0  9995
2 44713  53.0540 120.3456 0001400  90.1234 270.0000 15.06400000 12348
"#;

pub const GPS_TLE: &str = r#"
GPS BIIR-11 (PRN 19)
1 28474U 04045A   24226.50000000 -.00000010  00000-0  00000+0 0  9990
2 28474  55.1000 200.5000 0150000 250.0000 110.0000  2.00560000145676
"#;

pub const MOCK_GROUP: &str = r#"
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
STARLINK-1007
1 44713U 19074A   24226.50000000  .00001234  00000-0  10000-3 0  9995
2 44713  53.0540 120.3456 0001400  90.1234 270.0000 15.06400000 12348
GPS BIIR-11 (PRN 19)
1 28474U 04045A   24226.50000000 -.00000010  00000-0  00000+0 0  9990
2 28474  55.1000 200.5000 0150000 250.0000 110.0000  2.00560000145676
"#;

/// Split one of the mock blocks into (name, line1, line2).
pub fn mock_lines(block: &str) -> (&str, &str, &str) {
    let mut lines = block.trim().lines();
    let name = lines.next().unwrap_or_default();
    let line1 = lines.next().unwrap_or_default();
    let line2 = lines.next().unwrap_or_default();
    (name, line1, line2)
}
