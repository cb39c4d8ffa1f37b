//! Reading and writing `<calc_specs>` documents with quick-xml.

use std::io::BufRead;
use std::str::FromStr;

use log::warn;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{CalcSpecs, PlotSettings, RepaymentSettings, SettingsError};
use crate::{expression::NumericConstant, plot::domain::PlotDomain};

/// Deserialize a [`CalcSpecs`] document without validating it.
///
/// Declarations and comments before the root are skipped; any other root
/// element is an error.
pub fn deserialize_calc_specs(xml: &str) -> Result<CalcSpecs, SettingsError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"calc_specs" => break,
            Event::Empty(e) if e.name().as_ref() == b"calc_specs" => {
                return Ok(CalcSpecs::default());
            }
            Event::Start(e) | Event::Empty(e) => {
                return Err(SettingsError::UnexpectedElement {
                    expected: "calc_specs".to_string(),
                    found: String::from_utf8_lossy(e.name().as_ref()).to_string(),
                });
            }
            Event::Eof => return Err(SettingsError::UnexpectedEof),
            _ => {}
        }
        buf.clear();
    }
    buf.clear();

    let mut specs = CalcSpecs::default();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"plot" => specs.plot = read_plot(&mut reader, &mut buf)?,
                b"repayment" => specs.repayment = read_repayment(&mut reader, &mut buf)?,
                other => {
                    warn!(
                        "Ignoring unknown settings section <{}>",
                        String::from_utf8_lossy(other)
                    );
                    skip_element(&mut reader, &mut buf)?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"calc_specs" => break,
            Event::Eof => return Err(SettingsError::UnexpectedEof),
            _ => {}
        }
        buf.clear();
    }

    Ok(specs)
}

fn read_plot<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<PlotSettings, SettingsError> {
    let mut plot = PlotSettings::default();
    let (mut x_min, mut x_max) = plot.default_domain.x_range();
    let (mut y_min, mut y_max) = plot.default_domain.y_range();

    loop {
        match reader.read_event_into(buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"x_min" => x_min = read_number(reader, buf, "x_min")?,
                b"x_max" => x_max = read_number(reader, buf, "x_max")?,
                b"y_min" => y_min = read_number(reader, buf, "y_min")?,
                b"y_max" => y_max = read_number(reader, buf, "y_max")?,
                b"zoom_factor" => plot.zoom.factor = read_number(reader, buf, "zoom_factor")?,
                b"min_span" => plot.zoom.min_span = read_number(reader, buf, "min_span")?,
                b"resolution" => plot.resolution = read_count(reader, buf, "resolution")?,
                b"table_steps" => plot.table_steps = read_count(reader, buf, "table_steps")?,
                b"decimals" => plot.decimals = read_count(reader, buf, "decimals")?,
                other => {
                    warn!(
                        "Ignoring unknown plot setting <{}>",
                        String::from_utf8_lossy(other)
                    );
                    skip_element(reader, buf)?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"plot" => break,
            Event::Eof => return Err(SettingsError::UnexpectedEof),
            _ => {}
        }
        buf.clear();
    }

    plot.default_domain = PlotDomain::new(x_min, x_max, y_min, y_max)?;
    Ok(plot)
}

fn read_repayment<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<RepaymentSettings, SettingsError> {
    let mut repayment = RepaymentSettings::default();

    loop {
        match reader.read_event_into(buf)? {
            Event::Start(e) => match e.name().as_ref() {
                b"poverty_base" => {
                    repayment.poverty_base = read_number(reader, buf, "poverty_base")?
                }
                b"poverty_per_person" => {
                    repayment.poverty_per_person = read_number(reader, buf, "poverty_per_person")?
                }
                b"discretionary_multiplier" => {
                    repayment.discretionary_multiplier =
                        read_number(reader, buf, "discretionary_multiplier")?
                }
                b"icr_months" => repayment.icr_months = read_number(reader, buf, "icr_months")?,
                other => {
                    warn!(
                        "Ignoring unknown repayment setting <{}>",
                        String::from_utf8_lossy(other)
                    );
                    skip_element(reader, buf)?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"repayment" => break,
            Event::Eof => return Err(SettingsError::UnexpectedEof),
            _ => {}
        }
        buf.clear();
    }

    Ok(repayment)
}

/// Reads the text of the current element up to and including its end tag.
fn read_text_content<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<String, SettingsError> {
    let mut text = String::new();

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::End(_) => break,
            Event::Eof => return Err(SettingsError::UnexpectedEof),
            _ => {}
        }
    }

    Ok(text)
}

fn read_number<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
    element: &str,
) -> Result<f64, SettingsError> {
    let text = read_text_content(reader, buf)?;
    NumericConstant::from_str(&text)
        .map(f64::from)
        .map_err(|source| SettingsError::InvalidNumber {
            element: element.to_string(),
            source,
        })
}

fn read_count<R: BufRead, T: FromStr<Err = std::num::ParseIntError>>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
    element: &str,
) -> Result<T, SettingsError> {
    let text = read_text_content(reader, buf)?;
    text.trim()
        .parse::<T>()
        .map_err(|source| SettingsError::InvalidCount {
            element: element.to_string(),
            source,
        })
}

/// Skips the remainder of an element whose start tag was just read.
fn skip_element<R: BufRead>(reader: &mut Reader<R>, buf: &mut Vec<u8>) -> Result<(), SettingsError> {
    let mut depth = 1usize;
    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => return Err(SettingsError::UnexpectedEof),
            _ => {}
        }
    }
}

struct SpecsEmitter {
    writer: Writer<Vec<u8>>,
}

impl SpecsEmitter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 4),
        }
    }

    fn decl(&mut self) -> Result<(), SettingsError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn start(&mut self, name: &str) -> Result<(), SettingsError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), SettingsError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text_elem(&mut self, name: &str, text: &str) -> Result<(), SettingsError> {
        self.writer
            .create_element(name)
            .write_text_content(BytesText::new(text))?;
        Ok(())
    }

    fn num_elem(&mut self, name: &str, value: f64) -> Result<(), SettingsError> {
        // Whole numbers are written without a decimal point
        let text = if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{}", value)
        };
        self.text_elem(name, &text)
    }

    fn finish(self) -> Result<String, SettingsError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }
}

/// Serialize settings to a `<calc_specs>` document that
/// [`deserialize_calc_specs`] reads back unchanged.
pub fn serialize_calc_specs(specs: &CalcSpecs) -> Result<String, SettingsError> {
    let mut out = SpecsEmitter::new();
    let plot = &specs.plot;
    let repayment = &specs.repayment;

    out.decl()?;
    out.start("calc_specs")?;

    out.start("plot")?;
    out.num_elem("x_min", plot.default_domain.x_min())?;
    out.num_elem("x_max", plot.default_domain.x_max())?;
    out.num_elem("y_min", plot.default_domain.y_min())?;
    out.num_elem("y_max", plot.default_domain.y_max())?;
    out.num_elem("zoom_factor", plot.zoom.factor)?;
    out.num_elem("min_span", plot.zoom.min_span)?;
    out.text_elem("resolution", &plot.resolution.to_string())?;
    out.text_elem("table_steps", &plot.table_steps.to_string())?;
    out.text_elem("decimals", &plot.decimals.to_string())?;
    out.end("plot")?;

    out.start("repayment")?;
    out.num_elem("poverty_base", repayment.poverty_base)?;
    out.num_elem("poverty_per_person", repayment.poverty_per_person)?;
    out.num_elem("discretionary_multiplier", repayment.discretionary_multiplier)?;
    out.num_elem("icr_months", repayment.icr_months)?;
    out.end("repayment")?;

    out.end("calc_specs")?;
    out.finish()
}
