//! Runtime helper functions emitted at most once per output file.

use quill_ast::walk::walk_descendants;
use quill_ast::{NodeArena, NodeIndex, SyntaxKind};
use quill_common::CompilerOptions;

pub const EXTENDS_HELPER: &str = "\
var __extends = (this && this.__extends) || function (d, b) {
    for (var p in b) if (b.hasOwnProperty(p)) d[p] = b[p];
    function __() { this.constructor = d; }
    __.prototype = b.prototype;
    d.prototype = new __();
};";

pub const DECORATE_HELPER: &str = "\
var __decorate = (this && this.__decorate) || function (decorators, target, key, desc) {
    if (typeof Reflect === \"object\" && typeof Reflect.decorate === \"function\") return Reflect.decorate(decorators, target, key, desc);
    switch (arguments.length) {
        case 2: return decorators.reduceRight(function (o, d) { return (d && d(o)) || o; }, target);
        case 3: return decorators.reduceRight(function (o, d) { return (d && d(target, key)), void 0; }, void 0);
        case 4: return decorators.reduceRight(function (o, d) { return (d && d(target, key, o)) || o; }, desc);
    }
};";

pub const METADATA_HELPER: &str = "\
var __metadata = (this && this.__metadata) || function (k, v) {
    if (typeof Reflect === \"object\" && typeof Reflect.metadata === \"function\") return Reflect.metadata(k, v);
};";

pub const PARAM_HELPER: &str = "\
var __param = (this && this.__param) || function (index, decorator) {
    return function (target, key) { decorator(target, key, index); }
};";

pub const EXPORT_STAR_HELPER: &str = "\
function __export(m) {
    for (var p in m) if (!exports.hasOwnProperty(p)) exports[p] = m[p];
}";

/// Which helpers a file's body requires. Computed by a prepass so the
/// definitions can precede first use.
#[derive(Clone, Copy, Debug, Default)]
pub struct HelperNeeds {
    pub extends: bool,
    pub decorate: bool,
    pub param: bool,
    pub metadata: bool,
    pub export_star: bool,
}

impl HelperNeeds {
    /// Scan one source file for constructs whose lowering calls a helper.
    /// `export_star` is decided by the module prepass, not here.
    #[must_use]
    pub fn scan(arena: &NodeArena, file: NodeIndex, options: &CompilerOptions) -> HelperNeeds {
        let mut needs = HelperNeeds::default();
        walk_descendants(arena, file, &mut |idx| {
            let Some(node) = arena.get(idx) else {
                return;
            };
            match node.kind {
                SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression => {
                    if let Some(class) = arena.get_class(node) {
                        if class.base.is_some() && options.target.is_es5() {
                            needs.extends = true;
                        }
                        if class.decorators.is_some() {
                            needs.decorate = true;
                            if options.emit_decorator_metadata {
                                needs.metadata = true;
                            }
                        }
                        needs.scan_members(arena, class, options);
                    }
                }
                _ => {}
            }
        });
        needs
    }

    fn scan_members(
        &mut self,
        arena: &NodeArena,
        class: &quill_ast::node::ClassData,
        options: &CompilerOptions,
    ) {
        for &member_idx in &class.members.nodes {
            let Some(member) = arena.get(member_idx) else {
                continue;
            };
            let decorators = match member.kind {
                SyntaxKind::MethodDeclaration
                | SyntaxKind::Constructor
                | SyntaxKind::GetAccessor
                | SyntaxKind::SetAccessor => {
                    arena.get_function(member).and_then(|f| f.decorators.clone())
                }
                SyntaxKind::PropertyDeclaration => arena
                    .get_property_decl(member)
                    .and_then(|p| p.decorators.clone()),
                _ => None,
            };
            if decorators.is_some() {
                self.decorate = true;
                if options.emit_decorator_metadata {
                    self.metadata = true;
                }
            }
            // Parameter decorators ride on constructors and set accessors.
            if matches!(
                member.kind,
                SyntaxKind::MethodDeclaration | SyntaxKind::Constructor | SyntaxKind::SetAccessor
            ) {
                if let Some(func) = arena.get_function(member) {
                    for &param_idx in &func.parameters.nodes {
                        let has_param_decorators = arena
                            .get(param_idx)
                            .and_then(|p| arena.get_parameter(p))
                            .and_then(|p| p.decorators.as_ref())
                            .is_some_and(|d| !d.is_empty());
                        if has_param_decorators {
                            self.decorate = true;
                            self.param = true;
                            if options.emit_decorator_metadata {
                                self.metadata = true;
                            }
                        }
                    }
                }
            }
        }
    }
}

