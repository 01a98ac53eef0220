//! Tables held in a graphic frame (`a:tbl`).

use crate::common::xml::XmlNode;
use crate::ooxml::opc::Relationships;
use crate::ooxml::pptx::shapes::fill::FillSpec;
use crate::ooxml::pptx::shapes::textframe::{TextBody, VerticalAnchor};

/// `a:tcPr` attributes that are modeled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellProperties {
    pub anchor: Option<VerticalAnchor>,
    pub margin_left: Option<i64>,
    pub margin_right: Option<i64>,
    pub margin_top: Option<i64>,
    pub margin_bottom: Option<i64>,
    pub fill: Option<FillSpec>,
}

impl CellProperties {
    pub fn from_xml(node: &XmlNode) -> Self {
        Self {
            anchor: node.attr("anchor").and_then(VerticalAnchor::parse),
            margin_left: node.attr_i64("marL"),
            margin_right: node.attr_i64("marR"),
            margin_top: node.attr_i64("marT"),
            margin_bottom: node.attr_i64("marB"),
            fill: FillSpec::from_properties(node),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub text: TextBody,
    pub props: CellProperties,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Height in EMU
    pub height: i64,
    pub cells: Vec<TableCell>,
}

/// Grid and content of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBody {
    /// Special formatting for the first row (`tblPr/@firstRow`)
    pub first_row: bool,
    pub first_col: bool,
    pub band_row: bool,
    pub style_id: Option<String>,
    /// Column widths in EMU
    pub columns: Vec<i64>,
    pub rows: Vec<TableRow>,
}

impl TableBody {
    /// An empty `rows` x `cols` table spread evenly over `cx` x `cy`.
    ///
    /// The last column and row absorb the rounding remainder.
    pub fn new(rows: usize, cols: usize, cx: i64, cy: i64, style_id: &str) -> Self {
        Self {
            first_row: true,
            first_col: false,
            band_row: true,
            style_id: Some(style_id.to_string()),
            columns: even_split(cx, cols),
            rows: even_split(cy, rows)
                .into_iter()
                .map(|height| TableRow {
                    height,
                    cells: vec![TableCell::default(); cols],
                })
                .collect(),
        }
    }

    pub fn from_xml(tbl: &XmlNode, rels: Option<&Relationships>) -> Self {
        let tbl_pr = tbl.child("tblPr");
        let flag = |name: &str| tbl_pr.and_then(|p| p.attr_bool(name)).unwrap_or(false);
        let columns = tbl
            .child("tblGrid")
            .map(|grid| {
                grid.children_named("gridCol")
                    .map(|col| col.attr_i64("w").unwrap_or(0))
                    .collect()
            })
            .unwrap_or_default();
        let rows = tbl
            .children_named("tr")
            .map(|tr| TableRow {
                height: tr.attr_i64("h").unwrap_or(0),
                cells: tr
                    .children_named("tc")
                    .map(|tc| TableCell {
                        text: tc
                            .child("txBody")
                            .map(|body| TextBody::from_xml(body, rels))
                            .unwrap_or_default(),
                        props: tc.child("tcPr").map(CellProperties::from_xml).unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            first_row: flag("firstRow"),
            first_col: flag("firstCol"),
            band_row: flag("bandRow"),
            style_id: tbl_pr
                .and_then(|p| p.child("tableStyleId"))
                .map(XmlNode::text),
            columns,
            rows,
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row).and_then(|r| r.cells.get_mut(col))
    }
}

/// Split `total` into `parts` integral pieces that sum to `total`.
pub fn even_split(total: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as i64;
    let base = total / n;
    let mut out = vec![base; parts];
    if let Some(last) = out.last_mut() {
        *last = total - base * (n - 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        assert_eq!(even_split(100, 3), vec![33, 33, 34]);
        assert_eq!(even_split(90, 3), vec![30, 30, 30]);
        assert!(even_split(10, 0).is_empty());
    }

    #[test]
    fn test_new_table() {
        let table = TableBody::new(2, 3, 3_000, 800, "{GUID}");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows[1].height, 400);
        assert!(table.first_row);
        assert_eq!(table.cell(1, 2).map(|c| c.text.text()), Some(String::new()));
        assert!(table.cell(2, 0).is_none());
    }

    #[test]
    fn test_parse_table() {
        let tbl = XmlNode::parse(
            br#"<a:tbl xmlns:a="a">
                <a:tblPr firstRow="1" bandRow="1"><a:tableStyleId>{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}</a:tableStyleId></a:tblPr>
                <a:tblGrid><a:gridCol w="100"/><a:gridCol w="200"/></a:tblGrid>
                <a:tr h="50">
                    <a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>Price</a:t></a:r></a:p></a:txBody><a:tcPr anchor="ctr" marL="0"/></a:tc>
                    <a:tc><a:txBody><a:bodyPr/><a:p/></a:txBody><a:tcPr/></a:tc>
                </a:tr>
            </a:tbl>"#,
        )
        .unwrap();

        let table = TableBody::from_xml(&tbl, None);
        assert!(table.first_row);
        assert!(!table.first_col);
        assert_eq!(table.columns, vec![100, 200]);
        assert_eq!(table.cell(0, 0).unwrap().text.text(), "Price");
        assert_eq!(table.cell(0, 0).unwrap().props.anchor, Some(VerticalAnchor::Middle));
        assert_eq!(
            table.style_id.as_deref(),
            Some("{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}")
        );
    }
}
