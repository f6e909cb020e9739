//! The CodeLite project document.
//!
//! A [`ProjectDescriptor`] is assembled per target from its virtual folder
//! tree and one [`ConfigurationBlock`] per requested configuration, then
//! rendered with [`ProjectDescriptor::to_xml`].

use crate::{
    commands::BuildCommands, model::Configuration, platform::CommandSpec, vfs::VirtualFolder,
};
use std::fmt::Write;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const INDENT: &str = "  ";

/// Settings of one configuration: what to run and how to build it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationBlock {
    pub configuration: Configuration,
    pub general: CommandSpec,
    pub custom_build: BuildCommands,
}

#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    pub name: String,
    pub root: VirtualFolder,
    pub configurations: Vec<ConfigurationBlock>,
}
impl ProjectDescriptor {
    pub fn to_xml(&self) -> String {
        let mut xml = XmlWriter::new();

        xml.open("CodeLite_Project", &[("Name", self.name.as_str())]);
        write_folder(&mut xml, &self.root);

        xml.open("Settings", &[]);
        for block in &self.configurations {
            write_configuration(&mut xml, block);
        }
        xml.empty("GlobalSettings", &[]);
        xml.close("Settings");

        xml.close("CodeLite_Project");

        xml.finish()
    }
}

fn write_folder(xml: &mut XmlWriter, node: &VirtualFolder) {
    for folder in node.folders() {
        xml.open("VirtualDirectory", &[("Name", folder.name())]);
        write_folder(xml, folder);
        xml.close("VirtualDirectory");
    }

    for file in node.leaves() {
        let path = file.display().to_string();
        xml.empty("File", &[("Name", path.as_str())]);
    }
}

fn write_configuration(xml: &mut XmlWriter, block: &ConfigurationBlock) {
    xml.open("Configuration", &[("Name", block.configuration.as_str())]);

    let general = &block.general;
    let working_directory = general.working_directory.display().to_string();
    let mut attributes = Vec::with_capacity(3);
    if let Some(arguments) = &general.arguments {
        attributes.push(("CommandArguments", arguments.as_str()));
    }
    attributes.push(("WorkingDirectory", working_directory.as_str()));
    attributes.push(("Command", general.invocation.as_str()));
    xml.empty("General", &attributes);

    let build = &block.custom_build;
    xml.open("CustomBuild", &[("Enabled", "yes")]);
    xml.text(
        "WorkingDirectory",
        &[],
        &build.working_directory.display().to_string(),
    );
    xml.text("BuildCommand", &[], &build.build);
    xml.text("CleanCommand", &[], &build.clean);
    xml.text("RebuildCommand", &[], &build.rebuild);
    for target in &build.auxiliary {
        xml.text("Target", &[("Name", target.name.as_str())], &target.command);
    }
    xml.close("CustomBuild");

    xml.close("Configuration");
}

/// Minimal indenting XML emitter for documents built top-down.
struct XmlWriter {
    out: String,
    depth: usize,
}
impl XmlWriter {
    fn new() -> Self {
        let mut out = String::from(XML_DECLARATION);
        out.push('\n');
        Self { out, depth: 0 }
    }

    fn start_tag(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.out.push_str(&INDENT.repeat(self.depth));
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attributes {
            // writing into a String cannot fail
            let _ = write!(self.out, " {}=\"{}\"", key, escape_attribute(value));
        }
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.start_tag(name, attributes);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.out.push_str(&INDENT.repeat(self.depth));
        let _ = writeln!(self.out, "</{name}>");
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) {
        self.start_tag(name, attributes);
        self.out.push_str("/>\n");
    }

    fn text(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) {
        self.start_tag(name, attributes);
        let _ = writeln!(self.out, ">{}</{name}>", escape_text(text));
    }

    fn finish(self) -> String {
        self.out
    }
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Newlines and tabs are encoded so attribute normalization keeps them.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            other => escaped.push(other),
        }
    }
    escaped
}
