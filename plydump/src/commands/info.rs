use std::iter;

use failure::Error;
use term_painter::{Color, ToStyle};
use plydata::Header;

use crate::{
    args::{GlobalArgs, InfoArgs},
    ui,
};


pub fn run(_global_args: &GlobalArgs, args: &InfoArgs) -> Result<(), Error> {
    let reader = super::open(&args.file)?;
    let header = reader.header().clone();

    if args.read_body {
        super::read_body(reader, &args.file)?;
        info!("The body of '{}' is valid", args.file);
    }

    print_info(&header);

    Ok(())
}

/// Defines the characters to draw a table.
#[derive(Copy, Clone)]
struct TableStyle {
    horizontal: char,
    vertical: char,
    cross: char,
    vertical_double: char,
    cross_vertical_double: char,
}

/// A nice unicode table.
const UNICODE_TABLE: TableStyle = TableStyle {
    horizontal: '─',
    vertical: '│',
    cross: '┼',
    vertical_double: '║',
    cross_vertical_double: '╫',
};

/// Pretty prints all the information.
fn print_info(header: &Header) {
    // ----- Print encoding, comments and obj_info ---------------------------
    println!("Encoding: {}", Color::BrightWhite.bold().paint(header.encoding()));
    for comment in header.comments() {
        println!("Comment: {}", Color::White.dim().paint(comment));
    }
    for obj_info in header.obj_infos() {
        println!("Object info: {}", Color::White.dim().paint(obj_info));
    }

    if header.elements().is_empty() {
        println!();
        println!("The file does not declare any elements.");
        return;
    }


    // ----- Prepare table ---------------------------------------------------
    // One row per property. Element name and count are only printed in the
    // first row of each element.
    let mut cells = vec![
        vec!["element".to_string(), "count".into(), "property".into(), "type".into()],
    ];
    for elem in header.elements() {
        let count = ui::fmt_with_thousand_sep(elem.count as u64);
        if elem.property_defs.is_empty() {
            cells.push(vec![elem.name.clone(), count, "-".into(), "-".into()]);
            continue;
        }

        for (i, prop) in elem.property_defs.iter().enumerate() {
            let (name, count) = match i {
                0 => (elem.name.clone(), count.clone()),
                _ => (String::new(), String::new()),
            };
            cells.push(vec![name, count, prop.name.clone(), prop.ty.to_string()]);
        }
    }

    let style = UNICODE_TABLE;
    let num_cols = cells[0].len();
    let col_widths = (0..num_cols).map(|col| {
        cells.iter().map(|row| row[col].chars().count()).max().unwrap_or(0)
    }).collect::<Vec<_>>();

    let separator = |col: usize| match col {
        0 | 1 => style.vertical_double,
        _ => style.vertical,
    };


    // ----- Print header ----------------------------------------------------
    println!();
    for col in 0..num_cols {
        print!(" {: ^1$} ", cells[0][col], col_widths[col]);
        if col != num_cols - 1 {
            print!("{}", separator(col));
        }
    }
    println!();


    // ----- Print separator -------------------------------------------------
    for col in 0..num_cols {
        let line = iter::repeat(style.horizontal)
            .take(col_widths[col] + 2)
            .collect::<String>();
        print!("{}", line);

        match col {
            0 | 1 => print!("{}", style.cross_vertical_double),
            _ if col == num_cols - 1 => {}
            _ => print!("{}", style.cross),
        }
    }
    println!();


    // ----- Print table body ------------------------------------------------
    let label_style = Color::White.bold();
    let count_style = Color::Green.bold();
    let prop_style = Color::BrightBlue.bold();

    for row in &cells[1..] {
        print!(" {} {}", label_style.paint(format!("{: <1$}", row[0], col_widths[0])), separator(0));
        print!(" {} {}", count_style.paint(format!("{: >1$}", row[1], col_widths[1])), separator(1));
        print!(" {} {}", format!("{: <1$}", row[2], col_widths[2]), separator(2));
        print!(" {}", prop_style.paint(&row[3]));
        println!();
    }
}
