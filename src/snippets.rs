//! Built-in EPS example programs, loadable into the editor.

pub struct Snippet {
    pub name: &'static str,
    pub code: &'static str,
}

/// Buffer contents when no file is given on the command line.
pub const DEFAULT_PROGRAM: &str = "variable mensaje = \"Hola mundo\";\nmostrar(mensaje);\n";

pub const EXAMPLES: &[Snippet] = &[
    Snippet {
        name: "Greeting function",
        code: "funcion saludar(nombre: cadena){\n  mostrar('Hola, ' + nombre)\n}\nllamado saludar('Steph')\n",
    },
    Snippet {
        name: "Sum function",
        code: "funcion sumar(a: entero, b: entero) :\nentero { a + b }\nllamado sumar(5, 4)\n",
    },
    Snippet {
        name: "Conditional",
        code: "variable n = 1\nvariable m = 2\nsi(n == m){\n  mostrar(\"mismo valor\")\n}\nsino{\n  mostrar(\"valores diferentes\")\n}\n",
    },
    Snippet {
        name: "While loop",
        code: "variable contador = 0;\n\nmientras (contador < 5) {\n  mostrar(contador);\n  contador = contador + 1;\n}\n",
    },
    Snippet {
        name: "Lists",
        code: "variable lista = [1, 2, 3, 4, 5];\nmostrar(lista)\n",
    },
    Snippet {
        name: "Generated markup",
        code: "variable titulo = \"Mi P\u{e1}gina\";\nvariable contenido = div(h1(titulo), p(\"Este es un p\u{e1}rrafo de ejemplo\"));\n",
    },
];
