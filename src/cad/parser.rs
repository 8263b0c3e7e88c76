use thiserror::Error;

use crate::domain::Boundary;

#[derive(Debug, Error, PartialEq)]
pub enum CadError {
    #[error("line {line}: expected a DXF group code, found `{value}`")]
    MalformedGroupCode { line: usize, value: String },

    #[error("line {line}: group code {code} has no value")]
    MissingValue { line: usize, code: i32 },

    #[error("line {line}: invalid coordinate `{value}`")]
    InvalidCoordinate { line: usize, value: String },

    #[error("no polyline with at least 3 distinct vertices found in ENTITIES")]
    NoBoundary,
}

/// One group-code/value pair with the line number of its code
#[derive(Debug)]
struct Group<'a> {
    line: usize,
    code: i32,
    value: &'a str,
}

fn read_groups(text: &str) -> Result<Vec<Group<'_>>, CadError> {
    let mut groups = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((idx, raw_code)) = lines.next() {
        let trimmed = raw_code.trim();
        if trimmed.is_empty() {
            continue;
        }
        let code: i32 = trimmed.parse().map_err(|_| CadError::MalformedGroupCode {
            line: idx + 1,
            value: trimmed.to_string(),
        })?;
        let (_, value) = lines.next().ok_or(CadError::MissingValue {
            line: idx + 1,
            code,
        })?;
        groups.push(Group {
            line: idx + 1,
            code,
            value: value.trim(),
        });
    }

    Ok(groups)
}

fn coordinate(group: &Group<'_>) -> Result<f64, CadError> {
    group
        .value
        .parse()
        .map_err(|_| CadError::InvalidCoordinate {
            line: group.line + 1,
            value: group.value.to_string(),
        })
}

/// Polyline being collected from the entity stream
#[derive(Debug, Default)]
struct Outline {
    points: Vec<(f64, f64)>,
    pending_x: Option<f64>,
    /// False while reading a POLYLINE header, whose 10/20 pair is not a vertex
    collecting: bool,
}

impl Outline {
    fn lightweight() -> Self {
        Self {
            collecting: true,
            ..Default::default()
        }
    }

    fn push_x(&mut self, x: f64) {
        if self.collecting {
            self.pending_x = Some(x);
        }
    }

    fn push_y(&mut self, y: f64) {
        if let Some(x) = self.pending_x.take() {
            self.points.push((x, y));
        }
    }
}

/// Extract the site boundary from ASCII DXF text.
///
/// # Algorithm
/// 1. Split the file into group-code/value pairs
/// 2. Inside the ENTITIES section, collect vertices of every `LWPOLYLINE`
///    (repeated 10/20 pairs) and every `POLYLINE` (one 10/20 pair per
///    `VERTEX`, closed by `SEQEND`)
/// 3. Keep polylines with at least 3 distinct vertices and return the one
///    enclosing the largest area
///
/// The closed flag (group 70) is not checked; every polyline is treated as
/// implicitly closed, like any other boundary.
pub fn parse_dxf_boundary(text: &str) -> Result<Boundary, CadError> {
    let groups = read_groups(text)?;

    let mut outlines: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Option<Outline> = None;
    let mut in_entities = false;
    let mut expect_section_name = false;
    // Inside a POLYLINE, VERTEX entities belong to the current outline
    let mut heavy = false;

    for group in &groups {
        if expect_section_name && group.code == 2 {
            in_entities = group.value == "ENTITIES";
            expect_section_name = false;
            continue;
        }

        if group.code == 0 {
            match group.value {
                "SECTION" => expect_section_name = true,
                "ENDSEC" => {
                    finish(&mut current, &mut outlines);
                    in_entities = false;
                    heavy = false;
                }
                "LWPOLYLINE" if in_entities => {
                    finish(&mut current, &mut outlines);
                    current = Some(Outline::lightweight());
                    heavy = false;
                }
                "POLYLINE" if in_entities => {
                    finish(&mut current, &mut outlines);
                    current = Some(Outline::default());
                    heavy = true;
                }
                "VERTEX" if heavy => {
                    if let Some(outline) = current.as_mut() {
                        outline.collecting = true;
                        outline.pending_x = None;
                    }
                }
                "SEQEND" if heavy => {
                    finish(&mut current, &mut outlines);
                    heavy = false;
                }
                _ => {
                    finish(&mut current, &mut outlines);
                    heavy = false;
                }
            }
            continue;
        }

        let Some(outline) = current.as_mut() else {
            continue;
        };

        match group.code {
            10 => outline.push_x(coordinate(group)?),
            20 => outline.push_y(coordinate(group)?),
            _ => {}
        }
    }
    finish(&mut current, &mut outlines);

    outlines
        .into_iter()
        .map(Boundary::new)
        .filter(Boundary::is_valid)
        .max_by(|a, b| a.area().total_cmp(&b.area()))
        .ok_or(CadError::NoBoundary)
}

fn finish(current: &mut Option<Outline>, outlines: &mut Vec<Vec<(f64, f64)>>) {
    if let Some(outline) = current.take() {
        outlines.push(outline.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lwpolyline(points: &[(f64, f64)]) -> String {
        let mut out = format!("0\nLWPOLYLINE\n8\nSITE\n90\n{}\n70\n1\n", points.len());
        for (x, y) in points {
            out.push_str(&format!("10\n{x}\n20\n{y}\n"));
        }
        out
    }

    fn wrap_entities(body: &str) -> String {
        format!("0\nSECTION\n2\nENTITIES\n{body}0\nENDSEC\n0\nEOF\n")
    }

    #[test]
    fn test_parse_lwpolyline() {
        let dxf = wrap_entities(&lwpolyline(&[
            (0.0, 0.0),
            (250.0, 0.0),
            (250.0, 180.0),
            (0.0, 180.0),
        ]));
        let boundary = parse_dxf_boundary(&dxf).unwrap();
        assert_eq!(boundary, Boundary::rectangle(250.0, 180.0));
    }

    #[test]
    fn test_largest_outline_wins() {
        let small = lwpolyline(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (10.0, 20.0)]);
        let large = lwpolyline(&[(0.0, 0.0), (100.0, 0.0), (50.0, 80.0)]);
        let dxf = wrap_entities(&format!("{small}{large}"));

        let boundary = parse_dxf_boundary(&dxf).unwrap();
        assert_eq!(boundary.points.len(), 3);
        assert!((boundary.area() - 4000.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_heavy_polyline() {
        let body = "0\nPOLYLINE\n8\nSITE\n66\n1\n10\n0.0\n20\n0.0\n70\n1\n\
                    0\nVERTEX\n8\nSITE\n10\n0.0\n20\n0.0\n\
                    0\nVERTEX\n8\nSITE\n10\n40.0\n20\n0.0\n\
                    0\nVERTEX\n8\nSITE\n10\n40.0\n20\n30.0\n\
                    0\nSEQEND\n";
        let boundary = parse_dxf_boundary(&wrap_entities(body)).unwrap();
        assert_eq!(boundary.points, vec![(0.0, 0.0), (40.0, 0.0), (40.0, 30.0)]);
        assert!((boundary.area() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_ignores_blocks_section() {
        let block = lwpolyline(&[(0.0, 0.0), (1000.0, 0.0), (1000.0, 1000.0)]);
        let site = lwpolyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let dxf = format!(
            "0\nSECTION\n2\nBLOCKS\n{block}0\nENDSEC\n0\nSECTION\n2\nENTITIES\n{site}0\nENDSEC\n0\nEOF\n"
        );
        let boundary = parse_dxf_boundary(&dxf).unwrap();
        assert_eq!(boundary, Boundary::rectangle(10.0, 10.0));
    }

    #[test]
    fn test_open_polyline_counts_as_closed() {
        let body = "0\nLWPOLYLINE\n8\nSITE\n90\n3\n70\n0\n\
                    10\n0\n20\n0\n10\n60\n20\n0\n10\n0\n20\n40\n";
        let boundary = parse_dxf_boundary(&wrap_entities(body)).unwrap();
        assert_eq!(boundary.points.len(), 3);
        assert!((boundary.area() - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_outline() {
        let dxf = wrap_entities("0\nLINE\n10\n0\n20\n0\n11\n5\n21\n5\n");
        assert_eq!(parse_dxf_boundary(&dxf).unwrap_err(), CadError::NoBoundary);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            parse_dxf_boundary("0\nSECTION\nnot-a-code\nENTITIES\n"),
            Err(CadError::MalformedGroupCode { line: 3, .. })
        ));
        assert!(matches!(
            parse_dxf_boundary(&wrap_entities("0\nLWPOLYLINE\n10\nabc\n20\n1\n")),
            Err(CadError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            parse_dxf_boundary("0\nSECTION\n2"),
            Err(CadError::MissingValue { code: 2, .. })
        ));
    }
}
