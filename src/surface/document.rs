//! The self-contained print document

use crate::config::PhysicalLabelSize;
use crate::rendering::RasterArtifact;
use crate::PipelineConfig;

/// A print-ready HTML document sized to the physical label.
///
/// The page box, the body and the image all share one millimeter size, both
/// on screen and under `@media print`. The image is embedded as a data URL
/// and the document prints itself once the image has loaded and the settle
/// delay has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintDocument {
    html: String,
    size: PhysicalLabelSize,
}

impl PrintDocument {
    pub fn build(artifact: &RasterArtifact, size: PhysicalLabelSize, config: &PipelineConfig) -> Self {
        let w = size.css_width();
        let h = size.css_height();
        let title = escape_html(&config.document_title);
        let src = artifact.to_data_url();
        let delay = config.settle_delay_ms;

        let html = format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>
      @page {{
        size: {w} {h};
        margin: 0;
      }}
      body {{
        margin: 0;
        padding: 0;
        background: white;
        width: {w};
        height: {h};
        display: flex;
        justify-content: center;
        align-items: center;
      }}
      img {{
        width: {w};
        height: {h};
        object-fit: contain;
        image-rendering: -webkit-optimize-contrast;
        image-rendering: crisp-edges;
      }}
      @media print {{
        body {{
          background: white;
          width: {w};
          height: {h};
        }}
        img {{
          width: {w};
          height: {h};
        }}
      }}
    </style>
  </head>
  <body>
    <img id="label" src="{src}" alt="{title}">
    <script>
      (function () {{
        var img = document.getElementById('label');
        function printWhenSettled() {{
          setTimeout(function () {{ window.print(); }}, {delay});
        }}
        if (img.complete && img.naturalWidth > 0) {{
          printWhenSettled();
        }} else {{
          img.addEventListener('load', printWhenSettled, {{ once: true }});
        }}
      }})();
    </script>
  </body>
</html>
"#
        );

        Self { html, size }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }

    pub fn size(&self) -> PhysicalLabelSize {
        self.size
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> RasterArtifact {
        RasterArtifact {
            width: 800,
            height: 480,
            scale: 4,
            png_data: vec![1, 2, 3],
        }
    }

    #[test]
    fn page_and_image_share_size() {
        let doc = PrintDocument::build(&artifact(), PhysicalLabelSize::new(80.0, 50.0), &PipelineConfig::default());
        let html = doc.html();
        assert!(html.contains("size: 80mm 50mm;"));
        assert_eq!(html.matches("width: 80mm;").count(), 4);
        assert_eq!(html.matches("height: 50mm;").count(), 4);
        assert!(html.contains("margin: 0;"));
        assert!(html.contains("object-fit: contain;"));
        assert!(html.contains("image-rendering: crisp-edges;"));
    }

    #[test]
    fn image_is_inlined_and_print_is_deferred() {
        let cfg = PipelineConfig { settle_delay_ms: 400, ..Default::default() };
        let doc = PrintDocument::build(&artifact(), PhysicalLabelSize::default(), &cfg);
        assert!(doc.html().contains("src=\"data:image/png;base64,AQID\""));
        assert!(doc.html().contains("window.print(); }, 400);"));
    }

    #[test]
    fn title_is_escaped() {
        let cfg = PipelineConfig { document_title: "<Aspirin & Co>".into(), ..Default::default() };
        let doc = PrintDocument::build(&artifact(), PhysicalLabelSize::default(), &cfg);
        assert!(doc.html().contains("<title>&lt;Aspirin &amp; Co&gt;</title>"));
    }
}
