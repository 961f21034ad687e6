//! `NodeArena` creation and accessor methods.
//!
//! Nodes are created bottom-up: children exist before their parents, so
//! parent pointers can be fixed up at creation time. The arena also records
//! every identifier text it has seen; the emitter's name generator consults
//! that set when manufacturing collision-free names.

use rustc_hash::FxHashSet;

use crate::lines::compute_line_starts;
use crate::node::*;
use crate::syntax_kind::SyntaxKind;

#[derive(Default)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended: Vec<ExtendedNodeInfo>,

    pub identifiers: Vec<IdentifierData>,
    pub literals: Vec<LiteralData>,
    pub template_exprs: Vec<TemplateExprData>,
    pub template_spans: Vec<TemplateSpanData>,
    pub tagged_templates: Vec<TaggedTemplateData>,
    pub binary_exprs: Vec<BinaryExprData>,
    pub unary_exprs: Vec<UnaryExprData>,
    pub access_exprs: Vec<AccessExprData>,
    pub call_exprs: Vec<CallExprData>,
    pub wrapped_exprs: Vec<WrappedExprData>,
    pub conditional_exprs: Vec<ConditionalExprData>,
    pub literal_exprs: Vec<LiteralExprData>,
    pub functions: Vec<FunctionData>,
    pub classes: Vec<ClassData>,
    pub property_decls: Vec<PropertyDeclData>,
    pub parameters: Vec<ParameterData>,
    pub enums: Vec<EnumData>,
    pub enum_members: Vec<EnumMemberData>,
    pub modules: Vec<ModuleData>,
    pub blocks: Vec<BlockData>,
    pub variables: Vec<VariableData>,
    pub variable_declarations: Vec<VariableDeclarationData>,
    pub binding_patterns: Vec<BindingPatternData>,
    pub binding_elements: Vec<BindingElementData>,
    pub property_assignments: Vec<PropertyAssignmentData>,
    pub if_statements: Vec<IfData>,
    pub loops: Vec<LoopData>,
    pub for_in_of: Vec<ForInOfData>,
    pub returns: Vec<ReturnData>,
    pub switches: Vec<SwitchData>,
    pub case_clauses: Vec<CaseClauseData>,
    pub try_statements: Vec<TryData>,
    pub catch_clauses: Vec<CatchClauseData>,
    pub labeled: Vec<LabeledData>,
    pub qualified_names: Vec<QualifiedNameData>,
    pub import_decls: Vec<ImportDeclData>,
    pub import_clauses: Vec<ImportClauseData>,
    pub names: Vec<NameData>,
    pub named_bindings: Vec<NamedBindingsData>,
    pub specifiers: Vec<SpecifierData>,
    pub export_decls: Vec<ExportDeclData>,
    pub import_equals: Vec<ImportEqualsData>,
    pub source_files: Vec<SourceFileData>,

    /// Every identifier text ever added. Consulted by `is_unique_name`.
    pub identifier_names: FxHashSet<String>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    // =========================================================================
    // Header plumbing
    // =========================================================================

    fn push_node(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        self.extended.push(ExtendedNodeInfo::default());
        NodeIndex(index)
    }

    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some() {
            if let Some(info) = self.extended.get_mut(child.0 as usize) {
                info.parent = parent;
            }
        }
    }

    fn set_parent_list(&mut self, list: &NodeList, parent: NodeIndex) {
        for &child in &list.nodes {
            self.set_parent(child, parent);
        }
    }

    fn set_parent_opt_list(&mut self, list: &Option<NodeList>, parent: NodeIndex) {
        if let Some(l) = list {
            self.set_parent_list(l, parent);
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    #[must_use]
    pub fn kind(&self, idx: NodeIndex) -> SyntaxKind {
        self.get(idx).map_or(SyntaxKind::Unknown, |n| n.kind)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        if idx.is_none() {
            return NodeIndex::NONE;
        }
        self.extended
            .get(idx.0 as usize)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    pub fn add_flags(&mut self, idx: NodeIndex, flags: u32) {
        if let Some(node) = self.nodes.get_mut(idx.0 as usize) {
            node.flags |= flags as u16;
        }
    }

    #[must_use]
    pub fn has_flag(&self, idx: NodeIndex, flag: u32) -> bool {
        self.get(idx).is_some_and(|n| n.has_flag(flag))
    }

    // =========================================================================
    // Node creation
    // =========================================================================

    pub fn add_token(&mut self, kind: SyntaxKind, pos: u32, end: u32) -> NodeIndex {
        self.push_node(Node::new(kind, pos, end))
    }

    pub fn add_identifier(&mut self, pos: u32, end: u32, text: impl Into<String>) -> NodeIndex {
        let text = text.into();
        self.identifier_names.insert(text.clone());
        let data = self.identifiers.len() as u32;
        self.identifiers.push(IdentifierData { text });
        self.push_node(Node::with_data(SyntaxKind::Identifier, pos, end, data))
    }

    /// Manufacture an identifier with no source span.
    pub fn add_synthesized_identifier(&mut self, text: impl Into<String>) -> NodeIndex {
        let idx = self.add_identifier(0, 0, text);
        self.add_flags(idx, node_flags::SYNTHESIZED);
        idx
    }

    pub fn add_literal(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        text: impl Into<String>,
    ) -> NodeIndex {
        let data = self.literals.len() as u32;
        self.literals.push(LiteralData { text: text.into() });
        self.push_node(Node::with_data(kind, pos, end, data))
    }

    pub fn add_template_expr(
        &mut self,
        pos: u32,
        end: u32,
        head: NodeIndex,
        spans: NodeList,
    ) -> NodeIndex {
        let data = self.template_exprs.len() as u32;
        self.template_exprs.push(TemplateExprData {
            head,
            spans: spans.clone(),
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::TemplateExpression, pos, end, data));
        self.set_parent(head, idx);
        self.set_parent_list(&spans, idx);
        idx
    }

    pub fn add_template_span(
        &mut self,
        pos: u32,
        end: u32,
        expression: NodeIndex,
        literal: NodeIndex,
    ) -> NodeIndex {
        let data = self.template_spans.len() as u32;
        self.template_spans.push(TemplateSpanData {
            expression,
            literal,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::TemplateSpan, pos, end, data));
        self.set_parent(expression, idx);
        self.set_parent(literal, idx);
        idx
    }

    pub fn add_tagged_template(
        &mut self,
        pos: u32,
        end: u32,
        tag: NodeIndex,
        template: NodeIndex,
    ) -> NodeIndex {
        let data = self.tagged_templates.len() as u32;
        self.tagged_templates.push(TaggedTemplateData { tag, template });
        let idx = self.push_node(Node::with_data(
            SyntaxKind::TaggedTemplateExpression,
            pos,
            end,
            data,
        ));
        self.set_parent(tag, idx);
        self.set_parent(template, idx);
        idx
    }

    pub fn add_binary_expr(
        &mut self,
        pos: u32,
        end: u32,
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    ) -> NodeIndex {
        let data = self.binary_exprs.len() as u32;
        self.binary_exprs.push(BinaryExprData {
            left,
            operator,
            right,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::BinaryExpression, pos, end, data));
        self.set_parent(left, idx);
        self.set_parent(right, idx);
        idx
    }

    pub fn add_unary_expr(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        operator: SyntaxKind,
        operand: NodeIndex,
    ) -> NodeIndex {
        let data = self.unary_exprs.len() as u32;
        self.unary_exprs.push(UnaryExprData { operator, operand });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(operand, idx);
        idx
    }

    pub fn add_access_expr(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        expression: NodeIndex,
        member: NodeIndex,
    ) -> NodeIndex {
        let data = self.access_exprs.len() as u32;
        self.access_exprs.push(AccessExprData { expression, member });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(expression, idx);
        self.set_parent(member, idx);
        idx
    }

    pub fn add_call_expr(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        expression: NodeIndex,
        arguments: NodeList,
    ) -> NodeIndex {
        let data = self.call_exprs.len() as u32;
        self.call_exprs.push(CallExprData {
            expression,
            arguments: arguments.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(expression, idx);
        self.set_parent_list(&arguments, idx);
        idx
    }

    pub fn add_wrapped_expr(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        expression: NodeIndex,
    ) -> NodeIndex {
        let data = self.wrapped_exprs.len() as u32;
        self.wrapped_exprs.push(WrappedExprData { expression });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(expression, idx);
        idx
    }

    pub fn add_conditional_expr(
        &mut self,
        pos: u32,
        end: u32,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    ) -> NodeIndex {
        let data = self.conditional_exprs.len() as u32;
        self.conditional_exprs.push(ConditionalExprData {
            condition,
            when_true,
            when_false,
        });
        let idx = self.push_node(Node::with_data(
            SyntaxKind::ConditionalExpression,
            pos,
            end,
            data,
        ));
        self.set_parent(condition, idx);
        self.set_parent(when_true, idx);
        self.set_parent(when_false, idx);
        idx
    }

    pub fn add_literal_expr(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        elements: NodeList,
    ) -> NodeIndex {
        let data = self.literal_exprs.len() as u32;
        self.literal_exprs.push(LiteralExprData {
            elements: elements.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent_list(&elements, idx);
        idx
    }

    pub fn add_function(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        name: NodeIndex,
        parameters: NodeList,
        body: NodeIndex,
        decorators: Option<NodeList>,
    ) -> NodeIndex {
        let data = self.functions.len() as u32;
        self.functions.push(FunctionData {
            name,
            parameters: parameters.clone(),
            body,
            decorators: decorators.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent_list(&parameters, idx);
        self.set_parent(body, idx);
        self.set_parent_opt_list(&decorators, idx);
        idx
    }

    pub fn add_class(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        name: NodeIndex,
        base: NodeIndex,
        members: NodeList,
        decorators: Option<NodeList>,
    ) -> NodeIndex {
        let data = self.classes.len() as u32;
        self.classes.push(ClassData {
            name,
            base,
            members: members.clone(),
            decorators: decorators.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent(base, idx);
        self.set_parent_list(&members, idx);
        self.set_parent_opt_list(&decorators, idx);
        idx
    }

    pub fn add_property_decl(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        name: NodeIndex,
        initializer: NodeIndex,
        decorators: Option<NodeList>,
    ) -> NodeIndex {
        let data = self.property_decls.len() as u32;
        self.property_decls.push(PropertyDeclData {
            name,
            initializer,
            decorators: decorators.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent(initializer, idx);
        self.set_parent_opt_list(&decorators, idx);
        idx
    }

    pub fn add_parameter(
        &mut self,
        pos: u32,
        end: u32,
        name: NodeIndex,
        initializer: NodeIndex,
        decorators: Option<NodeList>,
    ) -> NodeIndex {
        let data = self.parameters.len() as u32;
        self.parameters.push(ParameterData {
            name,
            initializer,
            decorators: decorators.clone(),
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::Parameter, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent(initializer, idx);
        self.set_parent_opt_list(&decorators, idx);
        idx
    }

    pub fn add_decorator(&mut self, pos: u32, end: u32, expression: NodeIndex) -> NodeIndex {
        let data = self.wrapped_exprs.len() as u32;
        self.wrapped_exprs.push(WrappedExprData { expression });
        let idx = self.push_node(Node::with_data(SyntaxKind::Decorator, pos, end, data));
        self.set_parent(expression, idx);
        idx
    }

    pub fn add_enum(
        &mut self,
        pos: u32,
        end: u32,
        name: NodeIndex,
        members: NodeList,
    ) -> NodeIndex {
        let data = self.enums.len() as u32;
        self.enums.push(EnumData {
            name,
            members: members.clone(),
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::EnumDeclaration, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent_list(&members, idx);
        idx
    }

    pub fn add_enum_member(
        &mut self,
        pos: u32,
        end: u32,
        name: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let data = self.enum_members.len() as u32;
        self.enum_members.push(EnumMemberData { name, initializer });
        let idx = self.push_node(Node::with_data(SyntaxKind::EnumMember, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent(initializer, idx);
        idx
    }

    pub fn add_module(
        &mut self,
        pos: u32,
        end: u32,
        name: NodeIndex,
        body: NodeIndex,
    ) -> NodeIndex {
        let data = self.modules.len() as u32;
        self.modules.push(ModuleData { name, body });
        let idx = self.push_node(Node::with_data(SyntaxKind::ModuleDeclaration, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent(body, idx);
        idx
    }

    pub fn add_block(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        statements: NodeList,
    ) -> NodeIndex {
        let data = self.blocks.len() as u32;
        self.blocks.push(BlockData {
            statements: statements.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent_list(&statements, idx);
        idx
    }

    pub fn add_variable(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        declarations: NodeList,
    ) -> NodeIndex {
        let data = self.variables.len() as u32;
        self.variables.push(VariableData {
            declarations: declarations.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent_list(&declarations, idx);
        idx
    }

    pub fn add_variable_declaration(
        &mut self,
        pos: u32,
        end: u32,
        name: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let data = self.variable_declarations.len() as u32;
        self.variable_declarations
            .push(VariableDeclarationData { name, initializer });
        let idx = self.push_node(Node::with_data(
            SyntaxKind::VariableDeclaration,
            pos,
            end,
            data,
        ));
        self.set_parent(name, idx);
        self.set_parent(initializer, idx);
        idx
    }

    pub fn add_binding_pattern(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        elements: NodeList,
    ) -> NodeIndex {
        let data = self.binding_patterns.len() as u32;
        self.binding_patterns.push(BindingPatternData {
            elements: elements.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent_list(&elements, idx);
        idx
    }

    pub fn add_binding_element(
        &mut self,
        pos: u32,
        end: u32,
        property_name: NodeIndex,
        name: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let data = self.binding_elements.len() as u32;
        self.binding_elements.push(BindingElementData {
            property_name,
            name,
            initializer,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::BindingElement, pos, end, data));
        self.set_parent(property_name, idx);
        self.set_parent(name, idx);
        self.set_parent(initializer, idx);
        idx
    }

    pub fn add_property_assignment(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        name: NodeIndex,
        initializer: NodeIndex,
    ) -> NodeIndex {
        let data = self.property_assignments.len() as u32;
        self.property_assignments
            .push(PropertyAssignmentData { name, initializer });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent(initializer, idx);
        idx
    }

    pub fn add_if_statement(
        &mut self,
        pos: u32,
        end: u32,
        expression: NodeIndex,
        then_statement: NodeIndex,
        else_statement: NodeIndex,
    ) -> NodeIndex {
        let data = self.if_statements.len() as u32;
        self.if_statements.push(IfData {
            expression,
            then_statement,
            else_statement,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::IfStatement, pos, end, data));
        self.set_parent(expression, idx);
        self.set_parent(then_statement, idx);
        self.set_parent(else_statement, idx);
        idx
    }

    pub fn add_loop(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        initializer: NodeIndex,
        condition: NodeIndex,
        incrementor: NodeIndex,
        statement: NodeIndex,
    ) -> NodeIndex {
        let data = self.loops.len() as u32;
        self.loops.push(LoopData {
            initializer,
            condition,
            incrementor,
            statement,
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(initializer, idx);
        self.set_parent(condition, idx);
        self.set_parent(incrementor, idx);
        self.set_parent(statement, idx);
        idx
    }

    pub fn add_for_in_of(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        initializer: NodeIndex,
        expression: NodeIndex,
        statement: NodeIndex,
    ) -> NodeIndex {
        let data = self.for_in_of.len() as u32;
        self.for_in_of.push(ForInOfData {
            initializer,
            expression,
            statement,
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(initializer, idx);
        self.set_parent(expression, idx);
        self.set_parent(statement, idx);
        idx
    }

    pub fn add_return(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        expression: NodeIndex,
    ) -> NodeIndex {
        let data = self.returns.len() as u32;
        self.returns.push(ReturnData { expression });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(expression, idx);
        idx
    }

    pub fn add_switch(
        &mut self,
        pos: u32,
        end: u32,
        expression: NodeIndex,
        clauses: NodeList,
    ) -> NodeIndex {
        let data = self.switches.len() as u32;
        self.switches.push(SwitchData {
            expression,
            clauses: clauses.clone(),
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::SwitchStatement, pos, end, data));
        self.set_parent(expression, idx);
        self.set_parent_list(&clauses, idx);
        idx
    }

    pub fn add_case_clause(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        expression: NodeIndex,
        statements: NodeList,
    ) -> NodeIndex {
        let data = self.case_clauses.len() as u32;
        self.case_clauses.push(CaseClauseData {
            expression,
            statements: statements.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(expression, idx);
        self.set_parent_list(&statements, idx);
        idx
    }

    pub fn add_try(
        &mut self,
        pos: u32,
        end: u32,
        try_block: NodeIndex,
        catch_clause: NodeIndex,
        finally_block: NodeIndex,
    ) -> NodeIndex {
        let data = self.try_statements.len() as u32;
        self.try_statements.push(TryData {
            try_block,
            catch_clause,
            finally_block,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::TryStatement, pos, end, data));
        self.set_parent(try_block, idx);
        self.set_parent(catch_clause, idx);
        self.set_parent(finally_block, idx);
        idx
    }

    pub fn add_catch_clause(
        &mut self,
        pos: u32,
        end: u32,
        variable_declaration: NodeIndex,
        block: NodeIndex,
    ) -> NodeIndex {
        let data = self.catch_clauses.len() as u32;
        self.catch_clauses.push(CatchClauseData {
            variable_declaration,
            block,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::CatchClause, pos, end, data));
        self.set_parent(variable_declaration, idx);
        self.set_parent(block, idx);
        idx
    }

    pub fn add_labeled(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        label: NodeIndex,
        statement: NodeIndex,
    ) -> NodeIndex {
        let data = self.labeled.len() as u32;
        self.labeled.push(LabeledData { label, statement });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(label, idx);
        self.set_parent(statement, idx);
        idx
    }

    pub fn add_qualified_name(
        &mut self,
        pos: u32,
        end: u32,
        left: NodeIndex,
        right: NodeIndex,
    ) -> NodeIndex {
        let data = self.qualified_names.len() as u32;
        self.qualified_names.push(QualifiedNameData { left, right });
        let idx = self.push_node(Node::with_data(SyntaxKind::QualifiedName, pos, end, data));
        self.set_parent(left, idx);
        self.set_parent(right, idx);
        idx
    }

    pub fn add_import_decl(
        &mut self,
        pos: u32,
        end: u32,
        import_clause: NodeIndex,
        module_specifier: NodeIndex,
    ) -> NodeIndex {
        let data = self.import_decls.len() as u32;
        self.import_decls.push(ImportDeclData {
            import_clause,
            module_specifier,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::ImportDeclaration, pos, end, data));
        self.set_parent(import_clause, idx);
        self.set_parent(module_specifier, idx);
        idx
    }

    pub fn add_import_clause(
        &mut self,
        pos: u32,
        end: u32,
        name: NodeIndex,
        named_bindings: NodeIndex,
    ) -> NodeIndex {
        let data = self.import_clauses.len() as u32;
        self.import_clauses.push(ImportClauseData {
            name,
            named_bindings,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::ImportClause, pos, end, data));
        self.set_parent(name, idx);
        self.set_parent(named_bindings, idx);
        idx
    }

    pub fn add_namespace_import(&mut self, pos: u32, end: u32, name: NodeIndex) -> NodeIndex {
        let data = self.names.len() as u32;
        self.names.push(NameData { name });
        let idx = self.push_node(Node::with_data(SyntaxKind::NamespaceImport, pos, end, data));
        self.set_parent(name, idx);
        idx
    }

    pub fn add_named_bindings(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        elements: NodeList,
    ) -> NodeIndex {
        let data = self.named_bindings.len() as u32;
        self.named_bindings.push(NamedBindingsData {
            elements: elements.clone(),
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent_list(&elements, idx);
        idx
    }

    pub fn add_specifier(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        property_name: NodeIndex,
        name: NodeIndex,
    ) -> NodeIndex {
        let data = self.specifiers.len() as u32;
        self.specifiers.push(SpecifierData {
            property_name,
            name,
        });
        let idx = self.push_node(Node::with_data(kind, pos, end, data));
        self.set_parent(property_name, idx);
        self.set_parent(name, idx);
        idx
    }

    pub fn add_export_decl(
        &mut self,
        pos: u32,
        end: u32,
        export_clause: NodeIndex,
        module_specifier: NodeIndex,
    ) -> NodeIndex {
        let data = self.export_decls.len() as u32;
        self.export_decls.push(ExportDeclData {
            export_clause,
            module_specifier,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::ExportDeclaration, pos, end, data));
        self.set_parent(export_clause, idx);
        self.set_parent(module_specifier, idx);
        idx
    }

    pub fn add_export_assignment(
        &mut self,
        pos: u32,
        end: u32,
        expression: NodeIndex,
    ) -> NodeIndex {
        let data = self.wrapped_exprs.len() as u32;
        self.wrapped_exprs.push(WrappedExprData { expression });
        let idx = self.push_node(Node::with_data(SyntaxKind::ExportAssignment, pos, end, data));
        self.set_parent(expression, idx);
        idx
    }

    pub fn add_import_equals(
        &mut self,
        pos: u32,
        end: u32,
        name: NodeIndex,
        module_reference: NodeIndex,
    ) -> NodeIndex {
        let data = self.import_equals.len() as u32;
        self.import_equals.push(ImportEqualsData {
            name,
            module_reference,
        });
        let idx = self.push_node(Node::with_data(
            SyntaxKind::ImportEqualsDeclaration,
            pos,
            end,
            data,
        ));
        self.set_parent(name, idx);
        self.set_parent(module_reference, idx);
        idx
    }

    pub fn add_source_file(
        &mut self,
        file_name: impl Into<String>,
        text: impl Into<String>,
        statements: NodeList,
        is_external_module: bool,
    ) -> NodeIndex {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        let end = text.len() as u32;
        let data = self.source_files.len() as u32;
        self.source_files.push(SourceFileData {
            file_name: file_name.into(),
            text,
            statements: statements.clone(),
            line_starts,
            is_external_module,
        });
        let idx = self.push_node(Node::with_data(SyntaxKind::SourceFile, 0, end, data));
        self.set_parent_list(&statements, idx);
        idx
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    #[must_use]
    pub fn get_identifier(&self, node: &Node) -> Option<&IdentifierData> {
        self.identifiers.get(node.data as usize)
    }

    #[must_use]
    pub fn get_literal(&self, node: &Node) -> Option<&LiteralData> {
        self.literals.get(node.data as usize)
    }

    #[must_use]
    pub fn get_template_expr(&self, node: &Node) -> Option<&TemplateExprData> {
        self.template_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_template_span(&self, node: &Node) -> Option<&TemplateSpanData> {
        self.template_spans.get(node.data as usize)
    }

    #[must_use]
    pub fn get_tagged_template(&self, node: &Node) -> Option<&TaggedTemplateData> {
        self.tagged_templates.get(node.data as usize)
    }

    #[must_use]
    pub fn get_binary_expr(&self, node: &Node) -> Option<&BinaryExprData> {
        self.binary_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_unary_expr(&self, node: &Node) -> Option<&UnaryExprData> {
        self.unary_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_access_expr(&self, node: &Node) -> Option<&AccessExprData> {
        self.access_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_call_expr(&self, node: &Node) -> Option<&CallExprData> {
        self.call_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_wrapped_expr(&self, node: &Node) -> Option<&WrappedExprData> {
        self.wrapped_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_conditional_expr(&self, node: &Node) -> Option<&ConditionalExprData> {
        self.conditional_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_literal_expr(&self, node: &Node) -> Option<&LiteralExprData> {
        self.literal_exprs.get(node.data as usize)
    }

    #[must_use]
    pub fn get_function(&self, node: &Node) -> Option<&FunctionData> {
        self.functions.get(node.data as usize)
    }

    #[must_use]
    pub fn get_class(&self, node: &Node) -> Option<&ClassData> {
        self.classes.get(node.data as usize)
    }

    #[must_use]
    pub fn get_property_decl(&self, node: &Node) -> Option<&PropertyDeclData> {
        self.property_decls.get(node.data as usize)
    }

    #[must_use]
    pub fn get_parameter(&self, node: &Node) -> Option<&ParameterData> {
        self.parameters.get(node.data as usize)
    }

    #[must_use]
    pub fn get_enum(&self, node: &Node) -> Option<&EnumData> {
        self.enums.get(node.data as usize)
    }

    #[must_use]
    pub fn get_enum_member(&self, node: &Node) -> Option<&EnumMemberData> {
        self.enum_members.get(node.data as usize)
    }

    #[must_use]
    pub fn get_module(&self, node: &Node) -> Option<&ModuleData> {
        self.modules.get(node.data as usize)
    }

    #[must_use]
    pub fn get_block(&self, node: &Node) -> Option<&BlockData> {
        self.blocks.get(node.data as usize)
    }

    #[must_use]
    pub fn get_variable(&self, node: &Node) -> Option<&VariableData> {
        self.variables.get(node.data as usize)
    }

    #[must_use]
    pub fn get_variable_declaration(&self, node: &Node) -> Option<&VariableDeclarationData> {
        self.variable_declarations.get(node.data as usize)
    }

    #[must_use]
    pub fn get_binding_pattern(&self, node: &Node) -> Option<&BindingPatternData> {
        self.binding_patterns.get(node.data as usize)
    }

    #[must_use]
    pub fn get_binding_element(&self, node: &Node) -> Option<&BindingElementData> {
        self.binding_elements.get(node.data as usize)
    }

    #[must_use]
    pub fn get_property_assignment(&self, node: &Node) -> Option<&PropertyAssignmentData> {
        self.property_assignments.get(node.data as usize)
    }

    #[must_use]
    pub fn get_if_statement(&self, node: &Node) -> Option<&IfData> {
        self.if_statements.get(node.data as usize)
    }

    #[must_use]
    pub fn get_loop(&self, node: &Node) -> Option<&LoopData> {
        self.loops.get(node.data as usize)
    }

    #[must_use]
    pub fn get_for_in_of(&self, node: &Node) -> Option<&ForInOfData> {
        self.for_in_of.get(node.data as usize)
    }

    #[must_use]
    pub fn get_return(&self, node: &Node) -> Option<&ReturnData> {
        self.returns.get(node.data as usize)
    }

    #[must_use]
    pub fn get_switch(&self, node: &Node) -> Option<&SwitchData> {
        self.switches.get(node.data as usize)
    }

    #[must_use]
    pub fn get_case_clause(&self, node: &Node) -> Option<&CaseClauseData> {
        self.case_clauses.get(node.data as usize)
    }

    #[must_use]
    pub fn get_try(&self, node: &Node) -> Option<&TryData> {
        self.try_statements.get(node.data as usize)
    }

    #[must_use]
    pub fn get_catch_clause(&self, node: &Node) -> Option<&CatchClauseData> {
        self.catch_clauses.get(node.data as usize)
    }

    #[must_use]
    pub fn get_labeled(&self, node: &Node) -> Option<&LabeledData> {
        self.labeled.get(node.data as usize)
    }

    #[must_use]
    pub fn get_qualified_name(&self, node: &Node) -> Option<&QualifiedNameData> {
        self.qualified_names.get(node.data as usize)
    }

    #[must_use]
    pub fn get_import_decl(&self, node: &Node) -> Option<&ImportDeclData> {
        self.import_decls.get(node.data as usize)
    }

    #[must_use]
    pub fn get_import_clause(&self, node: &Node) -> Option<&ImportClauseData> {
        self.import_clauses.get(node.data as usize)
    }

    #[must_use]
    pub fn get_name_data(&self, node: &Node) -> Option<&NameData> {
        self.names.get(node.data as usize)
    }

    #[must_use]
    pub fn get_named_bindings(&self, node: &Node) -> Option<&NamedBindingsData> {
        self.named_bindings.get(node.data as usize)
    }

    #[must_use]
    pub fn get_specifier(&self, node: &Node) -> Option<&SpecifierData> {
        self.specifiers.get(node.data as usize)
    }

    #[must_use]
    pub fn get_export_decl(&self, node: &Node) -> Option<&ExportDeclData> {
        self.export_decls.get(node.data as usize)
    }

    #[must_use]
    pub fn get_import_equals(&self, node: &Node) -> Option<&ImportEqualsData> {
        self.import_equals.get(node.data as usize)
    }

    #[must_use]
    pub fn get_source_file(&self, node: &Node) -> Option<&SourceFileData> {
        self.source_files.get(node.data as usize)
    }

    // =========================================================================
    // Convenience lookups
    // =========================================================================

    /// Identifier text by node index; empty for non-identifiers.
    #[must_use]
    pub fn identifier_text(&self, idx: NodeIndex) -> &str {
        self.get(idx)
            .filter(|n| n.kind == SyntaxKind::Identifier)
            .and_then(|n| self.get_identifier(n))
            .map_or("", |data| data.text.as_str())
    }

    /// Literal text by node index; empty for non-literals.
    #[must_use]
    pub fn literal_text(&self, idx: NodeIndex) -> &str {
        self.get(idx)
            .and_then(|n| self.get_literal(n))
            .map_or("", |data| data.text.as_str())
    }
}
