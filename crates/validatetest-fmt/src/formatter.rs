//! # Tree-driven layout
//!
//! Walks a ValidateTest syntax tree and rebuilds the source text. Each
//! construct has an inline rendering (`*_inline`, returning a `String`) used
//! for width decisions, and a writer that emits the final layout into the
//! output buffer, splitting across lines where the rules require it.

use tree_sitter::{Language, Node, Parser};

use crate::options::FormatOptions;
use crate::rules;

/// Collects the direct children of `node`.
fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Direct children of `node` with the given kind.
fn children_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .collect()
}

/// First direct child of `node` with the given kind.
fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}

fn has_child_of_kind(node: Node<'_>, kind: &str) -> bool {
    child_of_kind(node, kind).is_some()
}

fn contains_nested_block(node: Node<'_>) -> bool {
    children(node).into_iter().any(|child| match child.kind() {
        "nested_structure_block" => true,
        "field_list" | "field" | "field_value" => contains_nested_block(child),
        _ => false,
    })
}

fn array_element_has_nested_block(element: Node<'_>) -> bool {
    children_of_kind(element, "array_structure")
        .into_iter()
        .any(contains_nested_block)
}

/// Elements of the `[…]` arrays directly inside a field value.
fn array_elements_of_value(node: Node<'_>) -> Vec<Node<'_>> {
    children_of_kind(node, "array")
        .into_iter()
        .flat_map(|array| children_of_kind(array, "array_element"))
        .collect()
}

fn field_value_has_nested_block(node: Node<'_>) -> bool {
    has_child_of_kind(node, "nested_structure_block")
        || array_elements_of_value(node)
            .into_iter()
            .any(array_element_has_nested_block)
}

fn field_value_has_array_structure(node: Node<'_>) -> bool {
    array_elements_of_value(node)
        .into_iter()
        .any(|element| has_child_of_kind(element, "array_structure"))
}

pub(crate) struct Formatter<'a> {
    source: &'a [u8],
    language: &'a Language,
    options: FormatOptions,
    output: String,
    indent: usize,
}

impl<'a> Formatter<'a> {
    pub(crate) fn new(source: &'a str, language: &'a Language, options: FormatOptions) -> Self {
        Self {
            source: source.as_bytes(),
            language,
            options,
            output: String::with_capacity(source.len()),
            indent: 0,
        }
    }

    /// Formats a `source_file` root. The result always ends with a newline.
    pub(crate) fn format(mut self, root: Node<'a>) -> String {
        self.write_source_file(root);
        if !self.output.ends_with('\n') {
            self.output.push('\n');
        }
        self.output
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn pad(&self) -> String {
        " ".repeat(self.indent)
    }

    fn fits(&self, extra: usize) -> bool {
        self.indent + extra <= self.options.max_line_length
    }

    fn structure_name(&self, node: Node<'_>) -> &'a str {
        child_of_kind(node, "structure_name")
            .map(|name| self.text(name))
            .unwrap_or("")
    }

    fn write_source_file(&mut self, node: Node<'a>) {
        let mut prev_end_byte = 0;

        for child in children(node) {
            let blank_lines =
                rules::blank_lines_between(self.source, prev_end_byte, child.start_byte());
            for _ in 0..blank_lines {
                self.output.push('\n');
            }

            match child.kind() {
                "comment" => {
                    self.write_comment(child);
                    self.output.push('\n');
                }
                "structure" => {
                    self.write_structure(child);
                    self.output.push('\n');
                }
                _ => {}
            }
            prev_end_byte = child.end_byte();
        }
    }

    // Inline renderings

    fn structure_inline(&self, node: Node<'_>) -> String {
        let mut result = self.structure_name(node).to_string();
        if let Some(fields) = child_of_kind(node, "field_list") {
            result.push_str(", ");
            result.push_str(&self.field_list_inline(fields));
        }
        if has_child_of_kind(node, ";") {
            result.push(';');
        }
        result
    }

    fn array_structure_inline(&self, node: Node<'_>) -> String {
        let mut result = self.structure_name(node).to_string();
        if let Some(fields) = child_of_kind(node, "field_list") {
            result.push_str(", ");
            result.push_str(&self.field_list_inline(fields));
        }
        result
    }

    fn field_list_inline(&self, node: Node<'_>) -> String {
        children_of_kind(node, "field")
            .into_iter()
            .map(|field| self.field_inline(field))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn field_inline(&self, node: Node<'_>) -> String {
        let mut result = String::new();
        if let Some(name) = node.child_by_field_name("name") {
            result.push_str(self.text(name));
        }
        result.push('=');
        if let Some(value) = node.child_by_field_name("value") {
            result.push_str(&self.field_value_inline(value));
        }
        result
    }

    fn field_value_inline(&self, node: Node<'_>) -> String {
        let mut result = String::new();
        for child in children(node) {
            match child.kind() {
                "nested_structure_block" => result.push_str(&self.nested_block_inline(child)),
                "array" => result.push_str(&self.array_inline(child)),
                "angle_bracket_array" => result.push_str(&self.angle_array_inline(child)),
                "typed_value" => result.push_str(&self.typed_value_inline(child)),
                "value" => result.push_str(&self.value_inline(child)),
                _ => {}
            }
        }
        result
    }

    fn nested_block_inline(&self, node: Node<'_>) -> String {
        let items: Vec<String> = block_items(node)
            .into_iter()
            .map(|child| match child.kind() {
                "structure" => self.structure_inline(child),
                "field_value" => self.field_value_inline(child),
                "comment" => self.text(child).to_string(),
                _ => String::new(),
            })
            .collect();
        format!("{{{}}}", items.join(", "))
    }

    fn typed_value_inline(&self, node: Node<'_>) -> String {
        let mut result = String::from("(");
        if let Some(type_name) = node.child_by_field_name("type") {
            result.push_str(self.text(type_name));
        }
        result.push(')');

        if let Some(value) = node.child_by_field_name("value") {
            match value.kind() {
                "array" => result.push_str(&self.array_inline(value)),
                "angle_bracket_array" => result.push_str(&self.angle_array_inline(value)),
                _ => result.push_str(self.text(value)),
            }
        }
        result
    }

    fn array_inline(&self, node: Node<'_>) -> String {
        let elements: Vec<String> = children_of_kind(node, "array_element")
            .into_iter()
            .map(|element| self.array_element_inline(element))
            .collect();
        format!("[{}]", elements.join(", "))
    }

    fn array_element_inline(&self, node: Node<'_>) -> String {
        let mut result = String::new();
        for child in children(node) {
            match child.kind() {
                "array_structure" => result.push_str(&self.array_structure_inline(child)),
                "typed_value" => result.push_str(&self.typed_value_inline(child)),
                "," => {}
                _ => result.push_str(self.text(child)),
            }
        }
        result
    }

    fn angle_array_inline(&self, node: Node<'_>) -> String {
        let values: Vec<String> = children_of_kind(node, "field_value")
            .into_iter()
            .map(|value| self.field_value_inline(value))
            .collect();
        format!("<{}>", values.join(", "))
    }

    fn value_inline(&self, node: Node<'_>) -> String {
        let text = self.text(node);
        self.convert_quoted_structure(text)
            .unwrap_or_else(|| text.to_string())
    }

    /// Rewrites a quoted issue structure as an array structure.
    fn convert_quoted_structure(&self, text: &str) -> Option<String> {
        let content = rules::quoted_structure_content(text)?;

        let mut parser = Parser::new();
        parser.set_language(self.language).ok()?;
        let tree = parser.parse(&content, None)?;
        let root = tree.root_node();

        let structure = if root.kind() == "source_file" {
            root.child(0)?
        } else {
            root
        };
        if structure.kind() != "structure" {
            return None;
        }

        let inner = Formatter::new(&content, self.language, self.options);
        let name = inner.structure_name(structure);
        let inline = inner.structure_inline(structure);

        if !rules::issue_structure(name) && self.fits(inline.len() + 2) {
            return Some(format!("[{inline}]"));
        }

        let field_pad = " ".repeat(self.indent + self.options.indent_width);
        let mut result = format!("[{name},\n");
        if let Some(fields) = child_of_kind(structure, "field_list") {
            for field in children_of_kind(fields, "field") {
                result.push_str(&field_pad);
                result.push_str(&inner.field_inline(field));
                result.push_str(",\n");
            }
        }
        result.push_str(&self.pad());
        result.push(']');
        Some(result)
    }

    // Layout predicates

    fn structure_fits_on_line(&self, node: Node<'_>) -> bool {
        if contains_nested_block(node)
            || rules::structure_always_multiline(self.structure_name(node))
        {
            return false;
        }
        let inline = self.structure_inline(node);
        self.fits(inline.len()) && !inline.contains('\n')
    }

    fn array_element_always_multiline(&self, element: Node<'_>) -> bool {
        children_of_kind(element, "array_structure")
            .into_iter()
            .find_map(|structure| child_of_kind(structure, "structure_name"))
            .is_some_and(|name| rules::array_structure_always_multiline(self.text(name)))
    }

    fn field_value_always_multiline(&self, node: Node<'_>) -> bool {
        array_elements_of_value(node)
            .into_iter()
            .any(|element| self.array_element_always_multiline(element))
    }

    // Writers

    fn write_structure(&mut self, node: Node<'a>) {
        if self.structure_fits_on_line(node) {
            let line = format!("{}{}", self.pad(), self.structure_inline(node));
            self.output.push_str(&line);
            return;
        }

        let name = self.structure_name(node);
        let pad = self.pad();
        self.output.push_str(&pad);
        self.output.push_str(name);

        if let Some(fields) = child_of_kind(node, "field_list") {
            self.output.push_str(",\n");
            self.indent += self.options.indent_width;
            self.write_field_list(fields);
            self.indent -= self.options.indent_width;
        }

        if has_child_of_kind(node, ";") {
            self.output.push(';');
        }
    }

    fn write_field_list(&mut self, node: Node<'a>) {
        for (i, field) in children_of_kind(node, "field").into_iter().enumerate() {
            if i > 0 {
                self.output.push_str(",\n");
            }
            let pad = self.pad();
            self.output.push_str(&pad);
            self.write_field(field);
        }
    }

    fn write_field(&mut self, node: Node<'a>) {
        if let Some(name) = node.child_by_field_name("name") {
            let name = self.text(name);
            self.output.push_str(name);
        }
        self.output.push('=');
        if let Some(value) = node.child_by_field_name("value") {
            self.write_field_value(value);
        }
    }

    fn write_field_value(&mut self, node: Node<'a>) {
        for child in children(node) {
            match child.kind() {
                "nested_structure_block" => self.write_nested_block(child),
                "array" => self.write_array(child),
                "angle_bracket_array" => self.write_angle_array(child),
                "typed_value" => self.write_typed_value(child),
                "value" => {
                    let value = self.value_inline(child);
                    self.output.push_str(&value);
                }
                _ => {}
            }
        }
    }

    fn write_typed_value(&mut self, node: Node<'a>) {
        self.output.push('(');
        if let Some(type_name) = node.child_by_field_name("type") {
            let type_name = self.text(type_name);
            self.output.push_str(type_name);
        }
        self.output.push(')');

        if let Some(value) = node.child_by_field_name("value") {
            match value.kind() {
                "array" => self.write_array(value),
                "angle_bracket_array" => self.write_angle_array(value),
                "value" => {
                    let value = self.value_inline(value);
                    self.output.push_str(&value);
                }
                _ => {
                    let value = self.text(value);
                    self.output.push_str(value);
                }
            }
        }
    }

    fn write_trailing_comment(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            self.output.push_str("  ");
            self.output.push_str(comment);
        }
    }

    fn write_nested_block(&mut self, node: Node<'a>) {
        self.output.push_str("{\n");
        self.indent += self.options.indent_width;

        let items = attach_trailing_comments(block_items(node));
        let has_complex_items = items.iter().any(|&(child, _)| {
            child.kind() == "structure"
                || (child.kind() == "field_value"
                    && (field_value_has_nested_block(child)
                        || field_value_has_array_structure(child)))
        });

        let pad = self.pad();
        let max = self.options.max_line_length;
        let mut line_len = 0;
        let mut line_started = false;

        for (idx, &(child, trailing)) in items.iter().enumerate() {
            let is_last = idx + 1 == items.len();
            let comment = trailing.map(|node| self.text(node));

            match child.kind() {
                "structure" => {
                    if line_started {
                        self.output.push_str(",\n");
                    }
                    self.write_structure(child);
                    self.output.push(',');
                    self.write_trailing_comment(comment);
                    self.output.push('\n');
                    line_started = false;
                    line_len = 0;
                }
                "field_value" if field_value_has_nested_block(child) => {
                    if line_started {
                        self.output.push_str(",\n");
                        line_started = false;
                    }
                    self.output.push_str(&pad);
                    self.write_field_value(child);
                    self.output.push(',');
                    self.write_trailing_comment(comment);
                    self.output.push('\n');
                    line_len = 0;
                }
                "field_value" => {
                    let value = self.field_value_inline(child);
                    let comment_len = comment.map_or(0, |text| 2 + text.len());
                    let comment_above =
                        comment.is_some() && !self.fits(value.len() + 1 + comment_len);

                    if comment_above {
                        if line_started {
                            self.output.push_str(",\n");
                            line_started = false;
                        }
                        if let Some(node) = trailing {
                            self.write_comment(node);
                            self.output.push('\n');
                        }
                    }
                    let inline_comment = if comment_above { None } else { comment };

                    if has_complex_items {
                        if line_started {
                            self.output.push_str(",\n");
                        }
                        self.output.push_str(&pad);
                        if self.field_value_always_multiline(child) || !self.fits(value.len()) {
                            self.write_field_value(child);
                        } else {
                            self.output.push_str(&value);
                        }
                        self.output.push(',');
                        self.write_trailing_comment(inline_comment);
                        self.output.push('\n');
                        line_started = false;
                        line_len = 0;
                        continue;
                    }

                    // Pack simple values up to the line limit.
                    if !line_started {
                        self.output.push_str(&pad);
                        line_len = self.indent;
                        line_started = true;
                    } else {
                        let inline_comment_len = inline_comment.map_or(0, |_| comment_len);
                        let needed = 2 + value.len() + inline_comment_len + 1;
                        if line_len + needed > max {
                            self.output.push_str(",\n");
                            self.output.push_str(&pad);
                            line_len = self.indent;
                        } else {
                            self.output.push_str(", ");
                            line_len += 2;
                        }
                    }

                    self.output.push_str(&value);
                    line_len += value.len();

                    if is_last {
                        self.output.push(',');
                        self.write_trailing_comment(inline_comment);
                        self.output.push('\n');
                        line_started = false;
                    } else if inline_comment.is_some() {
                        self.output.push(',');
                        self.write_trailing_comment(inline_comment);
                        self.output.push('\n');
                        line_started = false;
                        line_len = 0;
                    }
                }
                "comment" => {
                    if line_started {
                        self.output.push_str(",\n");
                        line_started = false;
                    }
                    self.write_comment(child);
                    self.output.push('\n');
                    line_len = 0;
                }
                _ => {}
            }
        }

        self.indent -= self.options.indent_width;
        let pad = self.pad();
        self.output.push_str(&pad);
        self.output.push('}');
    }

    fn write_array_element(&mut self, element: Node<'a>) {
        if let Some(structure) = child_of_kind(element, "array_structure") {
            self.write_array_structure(structure);
            return;
        }

        for child in children(element) {
            match child.kind() {
                "typed_value" => self.write_typed_value(child),
                "[" | "]" | "," => {}
                _ => {
                    let text = self.text(child);
                    self.output.push_str(text);
                }
            }
        }
    }

    /// Writes `name, fields…` without brackets, splitting the fields when
    /// required.
    fn write_array_structure(&mut self, node: Node<'a>) {
        let name = self.structure_name(node);
        self.output.push_str(name);

        let Some(fields) = child_of_kind(node, "field_list") else {
            return;
        };
        let inline = self.field_list_inline(fields);
        let multiline = rules::array_structure_always_multiline(name)
            || contains_nested_block(fields)
            || !self.fits(inline.len() + 2);

        if multiline {
            self.output.push_str(",\n");
            self.indent += self.options.indent_width;
            self.write_field_list(fields);
            self.indent -= self.options.indent_width;
        } else {
            self.output.push_str(", ");
            self.output.push_str(&inline);
        }
    }

    fn write_bracketed_structure(&mut self, structure: Node<'a>) {
        self.output.push('[');
        self.write_array_structure(structure);
        self.output.push(']');
    }

    fn write_array(&mut self, node: Node<'a>) {
        let elements = children_of_kind(node, "array_element");
        if elements.is_empty() {
            self.output.push_str("[]");
            return;
        }

        let has_nested_blocks = elements
            .iter()
            .any(|&element| array_element_has_nested_block(element));
        let has_always_multiline = elements
            .iter()
            .any(|&element| self.array_element_always_multiline(element));

        if !has_nested_blocks && !has_always_multiline {
            let inline = self.array_inline(node);
            if self.fits(inline.len()) && !inline.contains('\n') {
                self.output.push_str(&inline);
                return;
            }
        }

        if let &[element] = elements.as_slice() {
            if let Some(structure) = child_of_kind(element, "array_structure") {
                let split = has_nested_blocks
                    || has_always_multiline
                    || !self.fits(self.array_element_inline(element).len());
                if split {
                    self.write_bracketed_structure(structure);
                    return;
                }
            }
        }

        self.output.push_str("[\n");
        self.indent += self.options.indent_width;

        let pad = self.pad();
        let max = self.options.max_line_length;
        let mut line_len = 0;
        let mut line_started = false;

        for (i, &element) in elements.iter().enumerate() {
            let is_last = i + 1 == elements.len();

            if array_element_has_nested_block(element) {
                if line_started {
                    self.output.push_str(",\n");
                }
                self.output.push_str(&pad);
                self.write_array_element(element);
                self.output.push_str(",\n");
                line_started = false;
                line_len = 0;
            } else if has_child_of_kind(element, "array_structure") {
                // Structures get a line of their own.
                if line_started {
                    self.output.push_str(",\n");
                }
                let inline = self.array_element_inline(element);
                self.output.push_str(&pad);
                if self.array_element_always_multiline(element) || !self.fits(inline.len()) {
                    self.write_array_element(element);
                } else {
                    self.output.push_str(&inline);
                }
                self.output.push_str(",\n");
                line_started = false;
                line_len = 0;
            } else {
                let inline = self.array_element_inline(element);
                if !line_started {
                    self.output.push_str(&pad);
                    line_len = self.indent;
                    line_started = true;
                } else if line_len + 2 + inline.len() > max {
                    self.output.push_str(",\n");
                    self.output.push_str(&pad);
                    line_len = self.indent;
                } else {
                    self.output.push_str(", ");
                    line_len += 2;
                }

                self.output.push_str(&inline);
                line_len += inline.len();

                if is_last {
                    self.output.push_str(",\n");
                    line_started = false;
                }
            }
        }

        self.indent -= self.options.indent_width;
        let pad = self.pad();
        self.output.push_str(&pad);
        self.output.push(']');
    }

    fn write_angle_array(&mut self, node: Node<'a>) {
        self.output.push('<');
        for (i, value) in children_of_kind(node, "field_value").into_iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_field_value(value);
        }
        self.output.push('>');
    }

    fn write_comment(&mut self, node: Node<'_>) {
        let text = self.text(node);
        let lines = rules::wrap_comment(text, self.indent, self.options.max_line_length);
        self.output.push_str(&lines.join("\n"));
    }
}

/// Children of a `{…}` block without the braces and separators.
fn block_items(node: Node<'_>) -> Vec<Node<'_>> {
    children(node)
        .into_iter()
        .filter(|child| !matches!(child.kind(), "{" | "}" | ","))
        .collect()
}

/// Pairs each item with a comment that follows it on the same source row.
fn attach_trailing_comments<'t>(items: Vec<Node<'t>>) -> Vec<(Node<'t>, Option<Node<'t>>)> {
    let mut paired = Vec::with_capacity(items.len());
    let mut iter = items.into_iter().peekable();

    while let Some(item) = iter.next() {
        let trailing = if item.kind() == "comment" {
            None
        } else {
            iter.next_if(|next| {
                next.kind() == "comment" && next.start_position().row == item.end_position().row
            })
        };
        paired.push((item, trailing));
    }

    paired
}
