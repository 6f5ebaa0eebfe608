use criterion::{Criterion, black_box, criterion_group, criterion_main};
use codetrans::{BinaryOp, ClassType, Expr, Lang, LambdaBody, Member, Program, Stmt, TypeInfo};
use codetrans::{DataObjectLiteral, lang_for_name};

/// A loop-heavy program referencing a handful of types.
fn build_program(lang: &dyn Lang, statements: usize) -> Program {
    let color = ClassType::enumeration("io.example.Color");
    let server = ClassType::api("io.vertx.core.http.HttpServer");
    let body = (0..statements)
        .map(|i| {
            let options = DataObjectLiteral::new(
                ClassType::data_object("io.vertx.core.http.HttpServerOptions"),
                vec![
                    Member::single("host", Expr::string("localhost")),
                    Member::single("port", Expr::int(8000 + i)),
                ],
            )
            .expect("unique members");
            lang.enhanced_for_loop(
                "item",
                Expr::ident("items"),
                Stmt::block(vec![
                    lang.variable_decl(TypeInfo::Class(server.clone()), "opts", Some(options.into())),
                    Stmt::expr(lang.console(Expr::concat(
                        Expr::string("color: "),
                        lang.enum_constant(&color, "RED"),
                    ))),
                    Stmt::expr(Expr::call(
                        Some(lang.api_type(&server)),
                        "create",
                        vec![lang.async_result_handler(
                            &TypeInfo::primitive("int"),
                            "n",
                            LambdaBody::Expr(Box::new(Expr::binary(
                                Expr::ident("n"),
                                BinaryOp::Mul,
                                Expr::int(i),
                            ))),
                        )],
                    )),
                ]),
            )
        })
        .collect();
    Program::new(body)
}

fn bench_render(c: &mut Criterion) {
    for name in ["groovy", "lua"] {
        let provider = lang_for_name(name).expect("builtin language");
        let lang = provider.create(Default::default());
        let program = build_program(lang.as_ref(), 200);
        c.bench_function(&format!("render_{name}"), |b| {
            b.iter(|| {
                let source = lang.render(black_box(&program)).expect("render");
                black_box(source);
            })
        });
    }
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
