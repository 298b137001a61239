use std::io::Write;
use std::time::Duration;

use lewis_coach::{
    BuildSession, Catalog, CentralAtom, Inconsistency, Molecule, MoleculeRecord, PracticeSummary,
};

use crate::util::text::{count_noun, truncate};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_catalog(out: &mut impl Write, catalog: &Catalog) {
    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|m| {
            vec![
                m.formula().to_string(),
                truncate(m.name(), 22),
                m.atom_count().to_string(),
                m.total_valence_electrons().to_string(),
                m.geometry().map_or("—", |g| g.label()).to_string(),
            ]
        })
        .collect();

    print_grid(
        out,
        &format!("Catalog ({})", count_noun(catalog.len() as u32, "molecule")),
        &[
            ("Formula", false),
            ("Name", false),
            ("Atoms", true),
            ("e⁻", true),
            ("Geometry", false),
        ],
        &rows,
    );
}

pub fn print_consistency(out: &mut impl Write, issues: &[Inconsistency]) {
    if issues.is_empty() {
        let _ = writeln!(
            out,
            "{INDENT}✓ Every answer key spends exactly its valence electrons"
        );
        return;
    }
    let rows: Vec<Vec<String>> = issues
        .iter()
        .map(|i| {
            vec![
                i.formula.clone(),
                i.valence_electrons.to_string(),
                i.answer_key_electrons.to_string(),
            ]
        })
        .collect();
    print_grid(
        out,
        "Inconsistent Answer Keys",
        &[("Formula", false), ("Valence", true), ("Answer key", true)],
        &rows,
    );
}

pub fn print_answer_key(out: &mut impl Write, molecule: &Molecule) {
    let central = match molecule.central() {
        CentralAtom::None => "none (diatomic)".to_string(),
        CentralAtom::Candidates(c) => c
            .iter()
            .map(|&i| atom_label(molecule, i))
            .collect::<Vec<_>>()
            .join(" or "),
    };
    let mut rows = vec![
        ("Name", molecule.name().to_string()),
        (
            "Valence e⁻",
            molecule.total_valence_electrons().to_string(),
        ),
        ("Central atom", central),
    ];
    if let Some(geometry) = molecule.geometry() {
        rows.push(("Geometry", geometry.label().to_string()));
    }
    print_kv_table(out, molecule.formula(), &rows);

    let bonds: Vec<Vec<String>> = molecule
        .expected_bonds()
        .iter()
        .map(|b| {
            vec![
                format!(
                    "{} {} {}",
                    atom_label(molecule, b.pair.lo()),
                    b.order.glyph(),
                    atom_label(molecule, b.pair.hi())
                ),
                b.order.to_string(),
            ]
        })
        .collect();
    print_grid(out, "Bonds", &[("Bond", false), ("Order", false)], &bonds);

    let atoms: Vec<Vec<String>> = (0..molecule.atom_count())
        .map(|i| {
            let lone = molecule.expected_lone_pairs().get(&i).copied().unwrap_or(0);
            vec![atom_label(molecule, i), lone.to_string()]
        })
        .collect();
    print_grid(
        out,
        "Lone Pairs",
        &[("Atom", false), ("Pairs", true)],
        &atoms,
    );
}

/// Current drawing, per-atom tallies and bank for a session in progress.
pub fn print_status(out: &mut impl Write, session: &BuildSession<'_>) {
    let molecule = session.molecule();
    let coach = session.coach();

    let mut rows = vec![("Step", session.phase().to_string())];
    if let Some(total) = session.bank_total() {
        let remaining = session.bank_remaining().unwrap_or(total);
        rows.push(("Bank", format!("{remaining} / {total}")));
    }
    if let Some(choice) = session.chosen_central() {
        rows.push(("Central", choice.to_string()));
    }
    if session.answer_revealed() {
        rows.push(("Answer", "revealed".to_string()));
    }
    print_kv_table(out, &format!("{} ({})", molecule.formula(), molecule.name()), &rows);

    let atoms: Vec<Vec<String>> = molecule
        .atoms()
        .iter()
        .enumerate()
        .map(|(i, el)| {
            vec![
                atom_label(molecule, i),
                session.placements().lone_pair_count(i).to_string(),
                format!("{} / {}", coach.electrons_around(i), el.octet_target()),
            ]
        })
        .collect();
    print_grid(
        out,
        "Atoms",
        &[("Atom", false), ("Lone pairs", true), ("e⁻ around", true)],
        &atoms,
    );

    let bonds = session.placements().bonds();
    if !bonds.is_empty() {
        let rows: Vec<Vec<String>> = bonds
            .iter()
            .map(|(pair, order)| {
                vec![
                    format!(
                        "{} {} {}",
                        atom_label(molecule, pair.lo()),
                        order.glyph(),
                        atom_label(molecule, pair.hi())
                    ),
                    order.to_string(),
                ]
            })
            .collect();
        print_grid(out, "Bonds", &[("Bond", false), ("Order", false)], &rows);
    }
}

pub fn print_practice_summary(
    out: &mut impl Write,
    summary: &PracticeSummary,
    molecules: &[&Molecule],
    records: &[MoleculeRecord],
) {
    let per_molecule: Vec<Vec<String>> = molecules
        .iter()
        .zip(records)
        .map(|(m, r)| {
            vec![
                m.formula().to_string(),
                if r.solved { "✓" } else { "✗" }.to_string(),
                r.attempts.to_string(),
                r.time.map_or("—".to_string(), format_duration),
            ]
        })
        .collect();
    print_grid(
        out,
        "Practice Results",
        &[
            ("Molecule", false),
            ("Solved", false),
            ("Checks", true),
            ("Time", true),
        ],
        &per_molecule,
    );

    let mut rows = vec![
        ("Correct", format!("{} / {}", summary.correct, summary.total)),
        ("Checks", summary.attempts.to_string()),
    ];
    rows.push((
        "Common mistake",
        summary
            .most_common_error
            .map_or("none".to_string(), |(kind, n)| format!("{kind} ({n})")),
    ));
    if let Some(avg) = summary.average_time {
        rows.push(("Avg time", format_duration(avg)));
    }
    print_kv_table(out, "Summary", &rows);
}

fn atom_label(molecule: &Molecule, idx: usize) -> String {
    match molecule.atom(idx) {
        Some(el) => format!("{}{}", el.symbol(), idx),
        None => format!("?{idx}"),
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize, right: bool) -> String {
    let fill = " ".repeat(w.saturating_sub(width(s)));
    if right {
        format!("{fill}{s}")
    } else {
        format!("{s}{fill}")
    }
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 14usize;
    let sep_overhead = 7;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}┌─ {} ─┐", INDENT, truncate(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    for (key, value) in rows {
        let _ = writeln!(
            out,
            "{}│ {} │ {} │",
            INDENT,
            pad(key, key_w, false),
            pad(&truncate(value, val_w), val_w, true)
        );
    }
    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

/// Column table sized to its content; `headers` pairs each title with
/// whether the column is right-aligned.
fn print_grid(out: &mut impl Write, title: &str, headers: &[(&str, bool)], rows: &[Vec<String>]) {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(c, (h, _))| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|s| width(s))
                .chain(std::iter::once(width(h)))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let rule = |l: &str, m: &str, r: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{INDENT}{l}{}{r}", segments.join(m))
    };
    let line = |cells: &[String]| {
        let padded: Vec<String> = headers
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(c, ((_, right), &w))| {
                pad(cells.get(c).map_or("", String::as_str), w, *right)
            })
            .collect();
        format!("{INDENT}│ {} │", padded.join(" │ "))
    };

    let header_cells: Vec<String> = headers.iter().map(|(h, _)| h.to_string()).collect();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}┌─ {} ─┐", INDENT, truncate(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(out, "{}", line(&header_cells));
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));
    for row in rows {
        let _ = writeln!(out, "{}", line(row));
    }
    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn catalog_table_lists_every_formula() {
        let catalog = Catalog::builtin();
        let text = render(|out| print_catalog(out, catalog));
        for m in catalog {
            assert!(text.contains(m.formula()));
        }
        assert!(text.contains("17 molecules"));
    }

    #[test]
    fn answer_key_shows_bond_glyphs() {
        let co2 = Catalog::builtin().get("CO2").unwrap();
        let text = render(|out| print_answer_key(out, co2));
        assert!(text.contains("O0 = C1"));
        assert!(text.contains("C1 = O2"));
        assert!(text.contains("Central atom"));
    }

    #[test]
    fn grid_rows_have_equal_width() {
        let text = render(|out| {
            print_grid(
                out,
                "T",
                &[("A", false), ("Bee", true)],
                &[
                    vec!["x".into(), "1".into()],
                    vec!["longer".into(), "22".into()],
                ],
            )
        });
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| l.trim_start().starts_with('│'))
            .map(width)
            .collect();
        assert_eq!(widths.len(), 3);
        assert!(widths.iter().all(|&w| w == widths[0]));
    }

    #[test]
    fn durations_are_readable() {
        assert_eq!(format_duration(Duration::from_millis(4500)), "4.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 05s");
    }
}
