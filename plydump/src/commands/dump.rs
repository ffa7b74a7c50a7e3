use std::cmp;

use failure::Error;
use term_painter::{Color, ToStyle};
use plydata::{Element, PlyData};

use crate::{
    args::{DumpArgs, GlobalArgs},
    ui,
};


pub fn run(_global_args: &GlobalArgs, args: &DumpArgs) -> Result<(), Error> {
    let reader = super::open(&args.file)?;
    let ply = super::read_body(reader, &args.file)?;

    let elements = select_elements(&ply, args)?;
    for &elem in &elements {
        let props = select_properties(elem, args);
        if props.is_empty() {
            if !args.properties.is_empty() {
                warn!(
                    "Element '{}' has none of the requested properties, skipping it",
                    elem.name(),
                );
            }
            continue;
        }

        print_element(elem, &props, args.count)?;
    }

    for name in &args.properties {
        if !elements.iter().any(|e| e.has_property(name)) {
            warn!("None of the printed elements has a property '{}'", name);
        }
    }

    Ok(())
}

fn select_elements<'a>(ply: &'a PlyData, args: &DumpArgs) -> Result<Vec<&'a Element>, Error> {
    if args.elements.is_empty() {
        return Ok(ply.elements().iter().collect());
    }

    let mut out = Vec::with_capacity(args.elements.len());
    for name in &args.elements {
        out.push(ply.element(name)?);
    }

    Ok(out)
}

fn select_properties<'a>(elem: &'a Element, args: &DumpArgs) -> Vec<&'a str> {
    elem.property_names()
        .filter(|name| args.properties.is_empty() || args.properties.iter().any(|p| p == *name))
        .collect()
}

fn print_element(elem: &Element, props: &[&str], count: usize) -> Result<(), Error> {
    println!();
    println!(
        "{} ({} elements)",
        Color::White.bold().paint(elem.name()),
        ui::fmt_with_thousand_sep(elem.count() as u64),
    );

    let rows = cmp::min(count, elem.count());

    // Format all cells first to know the width of each column.
    let mut columns = Vec::with_capacity(props.len());
    for &name in props {
        let mut cells = Vec::with_capacity(rows);
        for row in 0..rows {
            let cell = match elem.get(row, name)? {
                Some(prop) => prop.to_string(),
                None => String::new(),
            };
            cells.push(cell);
        }
        columns.push(cells);
    }

    let widths = props.iter().zip(&columns).map(|(name, cells)| {
        cells.iter()
            .map(|c| c.chars().count())
            .chain(Some(name.chars().count()))
            .max()
            .unwrap_or(0)
    }).collect::<Vec<_>>();
    let index_width = cmp::max(1, rows.saturating_sub(1).to_string().len());

    let head_style = Color::BrightBlue.bold();
    print!("  {: >1$} │", "#", index_width);
    for (name, width) in props.iter().zip(&widths) {
        print!(" {}", head_style.paint(format!("{: >1$}", name, *width)));
    }
    println!();

    for row in 0..rows {
        print!("  {} │", Color::White.dim().paint(format!("{: >1$}", row, index_width)));
        for (cells, width) in columns.iter().zip(&widths) {
            print!(" {: >1$}", cells[row], *width);
        }
        println!();
    }

    if rows < elem.count() {
        println!("  ... {} more", ui::fmt_with_thousand_sep((elem.count() - rows) as u64));
    }

    Ok(())
}
