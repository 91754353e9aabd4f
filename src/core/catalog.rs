use crate::domain::model::{camel_case, kebab_case, ArtifactKind};
use crate::utils::error::Result;
use regex::{Captures, Regex};

/// How a matched span is re-emitted. Most rules are capture templates; shapes
/// whose output depends on a derived form of a capture (kebab-cased routes,
/// camelCased parameter names) use a compute function instead. Both are pure
/// text → text.
pub enum Replacement {
    Template(&'static str),
    Compute(fn(&Captures) -> String),
}

/// One declarative rewrite. Matching is order-sensitive within a rule set:
/// applying rule i can create or destroy the text rule i+1 would have matched,
/// so the declared order below is part of the contract.
pub struct RewriteRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: Replacement,
    pub applies_to: &'static [ArtifactKind],
}

impl RewriteRule {
    fn new(
        name: &'static str,
        pattern: &str,
        replacement: Replacement,
        applies_to: &'static [ArtifactKind],
    ) -> Result<Self> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            replacement,
            applies_to,
        })
    }

    /// Applies the rule everywhere it matches; a non-matching rule is a no-op.
    pub fn apply(&self, content: &str) -> String {
        match &self.replacement {
            Replacement::Template(template) => {
                self.pattern.replace_all(content, *template).into_owned()
            }
            Replacement::Compute(compute) => self
                .pattern
                .replace_all(content, |caps: &Captures| compute(caps))
                .into_owned(),
        }
    }
}

const SERVICE: &[ArtifactKind] = &[ArtifactKind::Service];
const CONTROLLER: &[ArtifactKind] = &[ArtifactKind::Controller];
const MODULE: &[ArtifactKind] = &[ArtifactKind::AggregationModule];
const ALL_KINDS: &[ArtifactKind] = &[
    ArtifactKind::Service,
    ArtifactKind::Controller,
    ArtifactKind::AggregationModule,
];

/// The full rule table, compiled once at startup and never mutated.
pub struct RuleCatalog {
    rules: Vec<RewriteRule>,
}

impl RuleCatalog {
    pub fn standard() -> Result<Self> {
        let rules = vec![
            // --- Service 規則 ---
            RewriteRule::new(
                "import-nest-injectable",
                r"(?m)^import \{ PrismaClient \} from '@prisma/client';$",
                Replacement::Template(
                    "import { Injectable } from '@nestjs/common';\nimport { PrismaService } from '../prisma/prisma.service';",
                ),
                SERVICE,
            )?,
            RewriteRule::new(
                "drop-prisma-instantiation",
                r"(?m)^const prisma = new PrismaClient\(\);\n?",
                Replacement::Template(""),
                SERVICE,
            )?,
            RewriteRule::new(
                "decorate-service-class",
                r"(?m)^(?:@Injectable\(\)\n)?export class ([A-Za-z0-9_]+Service)\b",
                Replacement::Template("@Injectable()\nexport class ${1}"),
                SERVICE,
            )?,
            RewriteRule::new(
                "inject-prisma-constructor",
                r"export class ([A-Za-z0-9_]+Service)([^{\n]*)\{\n(\s*constructor)?",
                Replacement::Compute(inject_prisma_constructor),
                SERVICE,
            )?,
            RewriteRule::new(
                "scope-prisma-receiver",
                r"(?m)(^|[^.\w])prisma\.",
                Replacement::Template("${1}this.prisma."),
                SERVICE,
            )?,
            // --- Controller 規則 ---
            RewriteRule::new(
                "import-nest-controller",
                r"(?m)^import \{ Request, Response \} from 'express';$",
                Replacement::Template(
                    "import { Controller, Get, Post, Put, Delete, Param, Body } from '@nestjs/common';",
                ),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "drop-service-instantiation",
                r"(?m)^const [a-z][A-Za-z0-9_]*Service = new [A-Za-z0-9_]+Service\([^)\n]*\);\n?",
                Replacement::Template(""),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "decorate-controller-class",
                r"(?m)^(?:@Controller\('[^']*'\)\n)?export class ([A-Za-z0-9_]+)Controller\b",
                Replacement::Compute(decorate_controller_class),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "inject-service-constructor",
                r"export class ([A-Za-z0-9_]+)Controller([^{\n]*)\{\n(\s*constructor)?",
                Replacement::Compute(inject_service_constructor),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "route-find-all",
                r"(?m)^([ \t]*)(?:@Get\(\)\n[ \t]*)?async (findAll|list|getAll)\(",
                Replacement::Template("${1}@Get()\n${1}async ${2}("),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "route-find-one",
                r"(?m)^([ \t]*)(?:@Get\(':id'\)\n[ \t]*)?async (findOne|getOne)\(",
                Replacement::Template("${1}@Get(':id')\n${1}async ${2}("),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "route-create",
                r"(?m)^([ \t]*)(?:@Post\(\)\n[ \t]*)?async (create|add)\(",
                Replacement::Template("${1}@Post()\n${1}async ${2}("),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "route-update",
                r"(?m)^([ \t]*)(?:@Put\(':id'\)\n[ \t]*)?async (update|edit)\(",
                Replacement::Template("${1}@Put(':id')\n${1}async ${2}("),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "route-remove",
                r"(?m)^([ \t]*)(?:@Delete\(':id'\)\n[ \t]*)?async (remove|destroy)\(",
                Replacement::Template("${1}@Delete(':id')\n${1}async ${2}("),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "strip-express-params",
                r"\((?:req: Request, res: Response|req, res)\)",
                Replacement::Template("()"),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "return-res-json",
                r"(?:return\s+)?\bres\.(?:status\(\d+\)\s*\.\s*)?json\(",
                Replacement::Template("return ("),
                CONTROLLER,
            )?,
            RewriteRule::new(
                "scope-service-receiver",
                r"(?m)(^|[^.\w])([a-z][A-Za-z0-9_]*Service)\.",
                Replacement::Template("${1}this.${2}."),
                CONTROLLER,
            )?,
            // --- Aggregation module 規則 ---
            RewriteRule::new(
                "import-nest-module",
                r"(?m)^import \{ Router \} from 'express';$",
                Replacement::Template("import { Module } from '@nestjs/common';"),
                MODULE,
            )?,
            // 惰性匹配一次吞掉 router 宣告、route 註冊與 default export。
            // 形狀不符時整段放過（fail-open），不去猜測殘缺結構。
            RewriteRule::new(
                "rewrite-router-body",
                r"(?s)import \{ ([A-Za-z0-9_]+)Controller \} from '\./([A-Za-z0-9_.-]+)\.controller';\n(.*?)export default router;\n?",
                Replacement::Compute(rewrite_router_body),
                MODULE,
            )?,
            // --- 共用 ---
            RewriteRule::new(
                "collapse-blank-runs",
                r"\n{3,}",
                Replacement::Template("\n\n"),
                ALL_KINDS,
            )?,
        ];

        Ok(Self { rules })
    }

    pub fn rules_for(&self, kind: ArtifactKind) -> Vec<&RewriteRule> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to.contains(&kind))
            .collect()
    }

    /// Applies every rule for `kind` in declared order. Returns the rewritten
    /// text and the number of rules whose application changed it.
    pub fn apply(&self, content: &str, kind: ArtifactKind) -> (String, usize) {
        let mut current = content.to_string();
        let mut hits = 0;

        for rule in self.rules_for(kind) {
            let next = rule.apply(&current);
            if next != current {
                tracing::debug!("Rule hit: {} ({:?})", rule.name, kind);
                hits += 1;
                current = next;
            }
        }

        (current, hits)
    }
}

fn inject_prisma_constructor(caps: &Captures) -> String {
    // 已有 constructor 時整段原樣吐回
    if caps.get(3).is_some() {
        return caps[0].to_string();
    }
    format!(
        "export class {}{}{{\n  constructor(private readonly prisma: PrismaService) {{}}\n\n",
        &caps[1], &caps[2]
    )
}

fn decorate_controller_class(caps: &Captures) -> String {
    let route = kebab_case(&caps[1]);
    format!("@Controller('{}')\nexport class {}Controller", route, &caps[1])
}

fn inject_service_constructor(caps: &Captures) -> String {
    if caps.get(3).is_some() {
        return caps[0].to_string();
    }
    let service = format!("{}Service", &caps[1]);
    let param = camel_case(&service);
    format!(
        "export class {}Controller{}{{\n  constructor(private readonly {}: {}) {{}}\n\n",
        &caps[1], &caps[2], param, service
    )
}

fn rewrite_router_body(caps: &Captures) -> String {
    let pascal = &caps[1];
    let stem = &caps[2];
    format!(
        "import {{ {pascal}Controller }} from './{stem}.controller';\n\
         import {{ {pascal}Service }} from './{stem}.service';\n\
         \n\
         @Module({{\n\
         \x20 controllers: [{pascal}Controller],\n\
         \x20 providers: [{pascal}Service],\n\
         \x20 exports: [{pascal}Service],\n\
         }})\n\
         export class {pascal}Module {{}}\n"
    )
}
