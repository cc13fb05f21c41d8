//! Draw.io (mxGraph) diagram export
//!
//! Tables become swimlanes coloured by layer with one child cell per column.
//! Relationships become edges between the table cells.

use crate::error::ExportResult;
use crate::{ExportOptions, Exporter};
use mc_core::{infer_relationships, Column, DomainCatalog, ExportFormat, TableDef};
use std::collections::HashMap;

const ORIGIN: u32 = 50;
const TABLE_WIDTH: u32 = 220;
const COLUMN_SPACING: u32 = 250;
const WRAP_X: u32 = 1000;
const HEADER_HEIGHT: u32 = 26;
const ROW_HEIGHT: u32 = 20;
const ROW_GAP: u32 = 50;

pub struct DrawioExporter;

impl Exporter for DrawioExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Drawio
    }

    fn export(&self, catalog: &DomainCatalog, options: &ExportOptions) -> ExportResult<String> {
        Ok(to_drawio(catalog, options))
    }
}

/// Escape a value for use inside a double-quoted XML attribute.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

fn column_label(table: &TableDef, column: &Column) -> String {
    let marker = if column.primary_key || table.is_primary_key(&column.name) {
        "PK "
    } else if column.foreign_key {
        "FK "
    } else {
        ""
    };
    format!("{}{}: {}", marker, column.name, column.data_type)
}

/// Top-left corner of every table, in catalog order.
///
/// Tables are placed left to right, wrapping once x passes the limit. Each
/// row is as tall as its tallest table plus a gap.
fn layout(heights: &[u32]) -> Vec<(u32, u32)> {
    let mut positions = Vec::with_capacity(heights.len());
    let (mut x, mut y) = (ORIGIN, ORIGIN);
    let mut row_height = 0;
    for &height in heights {
        positions.push((x, y));
        row_height = row_height.max(height);
        x += COLUMN_SPACING;
        if x > WRAP_X {
            x = ORIGIN;
            y += row_height + ROW_GAP;
            row_height = 0;
        }
    }
    positions
}

pub fn to_drawio(catalog: &DomainCatalog, options: &ExportOptions) -> String {
    let domain = &catalog.domain;
    let tables: Vec<&TableDef> = catalog.tables().collect();

    let drawn: Vec<(&[Column], usize)> = tables
        .iter()
        .map(|t| {
            let limit = match options.drawio_max_columns {
                0 => t.columns.len(),
                n => n.min(t.columns.len()),
            };
            (&t.columns[..limit], t.columns.len() - limit)
        })
        .collect();
    let heights: Vec<u32> = drawn
        .iter()
        .map(|(cols, hidden)| {
            let rows = cols.len() + usize::from(*hidden > 0);
            HEADER_HEIGHT + ROW_HEIGHT * rows.max(1) as u32
        })
        .collect();
    let positions = layout(&heights);

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<mxfile host=\"mcat\" agent=\"mcat\" version=\"1.0\"");
    if let Some(stamp) = options.stamp() {
        xml.push_str(&format!(" modified=\"{}\"", xml_escape(&stamp)));
    }
    xml.push_str(">\n");
    xml.push_str(&format!(
        "  <diagram id=\"{}\" name=\"{}\">\n",
        xml_escape(domain.id.as_str()),
        xml_escape(&format!("{} Data Model", domain.name))
    ));
    xml.push_str(
        "    <mxGraphModel dx=\"1422\" dy=\"794\" grid=\"1\" gridSize=\"10\" guides=\"1\" tooltips=\"1\" connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"1\" pageWidth=\"1169\" pageHeight=\"827\">\n",
    );
    xml.push_str("      <root>\n");
    xml.push_str("        <mxCell id=\"0\" />\n");
    xml.push_str("        <mxCell id=\"1\" parent=\"0\" />\n");

    let mut cell_ids: HashMap<&str, String> = HashMap::new();
    for (index, table) in tables.iter().enumerate() {
        let id = format!("table_{}", index);
        let (x, y) = positions[index];
        let (columns, hidden) = drawn[index];
        let layer = table.layer;

        xml.push_str(&format!(
            "        <mxCell id=\"{}\" value=\"{}\" style=\"swimlane;fontStyle=1;align=center;verticalAlign=top;childLayout=stackLayout;horizontal=1;startSize={};horizontalStack=0;resizeParent=1;resizeParentMax=0;resizeLast=0;collapsible=1;marginBottom=0;fillColor={};strokeColor={};\" vertex=\"1\" parent=\"1\">\n",
            id,
            xml_escape(table.name.as_str()),
            HEADER_HEIGHT,
            layer.fill_color(),
            layer.stroke_color()
        ));
        xml.push_str(&format!(
            "          <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\" />\n",
            x, y, TABLE_WIDTH, heights[index]
        ));
        xml.push_str("        </mxCell>\n");

        let mut labels: Vec<String> = columns.iter().map(|c| column_label(table, c)).collect();
        if hidden > 0 {
            labels.push(format!("... ({} more)", hidden));
        }
        for (row, label) in labels.iter().enumerate() {
            xml.push_str(&format!(
                "        <mxCell id=\"{}_col_{}\" value=\"{}\" style=\"text;strokeColor=none;fillColor=none;align=left;verticalAlign=middle;spacingLeft=4;spacingRight=4;overflow=hidden;rotatable=0;points=[[0,0.5],[1,0.5]];portConstraint=eastwest;\" vertex=\"1\" parent=\"{}\">\n",
                id,
                row,
                xml_escape(label),
                id
            ));
            xml.push_str(&format!(
                "          <mxGeometry y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\" />\n",
                HEADER_HEIGHT + ROW_HEIGHT * row as u32,
                TABLE_WIDTH,
                ROW_HEIGHT
            ));
            xml.push_str("        </mxCell>\n");
        }
        cell_ids.insert(table.name.as_str(), id);
    }

    for (index, rel) in infer_relationships(catalog).iter().enumerate() {
        let (Some(source), Some(target)) = (
            cell_ids.get(rel.from_table.as_str()),
            cell_ids.get(rel.to_table.as_str()),
        ) else {
            continue;
        };
        xml.push_str(&format!(
            "        <mxCell id=\"edge_{}\" value=\"{}\" style=\"edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;jettySize=auto;html=1;endArrow=ERmandOne;startArrow=ERmany;\" edge=\"1\" parent=\"1\" source=\"{}\" target=\"{}\">\n",
            index,
            xml_escape(&rel.from_column),
            source,
            target
        ));
        xml.push_str("          <mxGeometry relative=\"1\" as=\"geometry\" />\n");
        xml.push_str("        </mxCell>\n");
    }

    xml.push_str("      </root>\n");
    xml.push_str("    </mxGraphModel>\n");
    xml.push_str("  </diagram>\n");
    xml.push_str("</mxfile>\n");
    xml
}

#[cfg(test)]
#[path = "drawio_test.rs"]
mod tests;
