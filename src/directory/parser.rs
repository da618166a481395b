//! Directory page parser
//!
//! The directory lists instances in one table per PrivateBin version:
//!
//! ```html
//! <h5>Version 1.7.1</h5>
//! <table>
//!   <tbody>
//!     <tr><td>https://a.example</td> ... <td>99.50%</td></tr>
//!   </tbody>
//! </table>
//! ```
//!
//! Column 0 holds the address and column 7 the uptime. Anything that does not
//! fit this shape is skipped rather than treated as an error.

use crate::census::compile_selector;
use crate::state::Instance;
use crate::ScoutError;
use scraper::{ElementRef, Html, Selector};

/// Minimum cells a row needs to carry both address and uptime
pub const MIN_COLUMNS: usize = 8;

const ADDRESS_COLUMN: usize = 0;
const UPTIME_COLUMN: usize = 7;

struct DirectorySelectors {
    headings: Selector,
    rows: Selector,
    cells: Selector,
}

impl DirectorySelectors {
    fn new() -> Result<Self, ScoutError> {
        Ok(Self {
            headings: compile_selector("h5")?,
            rows: compile_selector("tbody tr")?,
            cells: compile_selector("td")?,
        })
    }
}

/// Parses the directory HTML into candidate instances
///
/// # Arguments
///
/// * `html` - The directory page body
/// * `version_prefix` - Literal prefix stripped from each heading (e.g. "Version ")
///
/// # Returns
///
/// * `Ok(Vec<Instance>)` - Every row with a numeric uptime, in page order
/// * `Err(ScoutError)` - The selectors could not be compiled
///
/// # Example
///
/// ```
/// use binscout::directory::parse_directory;
///
/// let html = r#"<h5>Version 1.7.1</h5><table><tr>
///     <td>https://a.example</td><td></td><td></td><td></td>
///     <td></td><td></td><td></td><td>99.50%</td></tr></table>"#;
/// let instances = parse_directory(html, "Version ").unwrap();
/// assert_eq!(instances[0].version, "1.7.1");
/// assert_eq!(instances[0].uptime, 99.5);
/// ```
pub fn parse_directory(html: &str, version_prefix: &str) -> Result<Vec<Instance>, ScoutError> {
    let selectors = DirectorySelectors::new()?;
    let document = Html::parse_document(html);
    let mut instances = Vec::new();

    for heading in document.select(&selectors.headings) {
        let heading_text = element_text(&heading);
        let version = heading_text
            .strip_prefix(version_prefix)
            .unwrap_or(&heading_text)
            .to_string();

        let Some(table) = next_element_sibling(&heading) else {
            continue;
        };
        if table.value().name() != "table" {
            tracing::debug!("Heading '{}' is not followed by a table, skipping", heading_text);
            continue;
        }

        for row in table.select(&selectors.rows) {
            let cells: Vec<ElementRef> = row.select(&selectors.cells).collect();
            if cells.len() < MIN_COLUMNS {
                continue;
            }

            let address = element_text(&cells[ADDRESS_COLUMN]);
            let uptime_raw = element_text(&cells[UPTIME_COLUMN]);

            match parse_uptime(&uptime_raw) {
                Some(uptime) => instances.push(Instance::new(version.clone(), address, uptime)),
                None => {
                    tracing::debug!("Skipping {}: uptime '{}' is not a number", address, uptime_raw)
                }
            }
        }
    }

    Ok(instances)
}

/// Parses an uptime cell such as " 99.50% " into a percentage
///
/// `NaN` and infinities parse as floats but are not uptimes, so they are
/// rejected along with any other non-numeric text.
pub fn parse_uptime(raw: &str) -> Option<f64> {
    raw.trim()
        .replace('%', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|uptime| uptime.is_finite())
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn next_element_sibling<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}
